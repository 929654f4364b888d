//! Async clients for the upstream package-tracking provider.
//!
//! Two interchangeable implementations of [`TrackingProvider`]:
//! [`UpstreamClient`] makes real network calls with a bounded retry on
//! transient statuses; [`SimulatedProvider`] fabricates envelopes behind
//! the same contract for network-free environments. `rastro-core`
//! consumes either through the trait.

pub mod client;
pub mod error;
pub mod provider;
pub mod sim;
pub mod transport;
pub mod types;

pub use client::UpstreamClient;
pub use error::Error;
pub use provider::TrackingProvider;
pub use sim::SimulatedProvider;
pub use transport::TransportConfig;
pub use types::{RawTrackingDocument, RawTrackingEvent, TrackEnvelope};
