//! rastro-core: batch orchestration and response normalization.
//!
//! Takes a list of tracking codes, collapses duplicates, fans lookups
//! out through a [`TrackingProvider`](rastro_api::TrackingProvider)
//! under a concurrency cap, normalizes each envelope into a sorted
//! event timeline, and aggregates everything into one [`BatchSummary`]
//! with per-code failure isolation.

pub mod batch;
pub mod config;
pub mod convert;
pub mod error;
pub mod model;

// ── Primary re-exports ──────────────────────────────────────────────
pub use batch::{BatchTracker, dedupe_codes};
pub use config::TrackerConfig;
pub use convert::normalize_envelope;
pub use error::CoreError;
pub use model::{BatchSummary, NormalizedRecord, TrackError, TrackResult, TrackingEvent};
