//! rastro-server: HTTP boundary for batch tracking lookups.
//!
//! Thin layer over `rastro-core`: request validation, the batch and
//! health endpoints, and startup wiring. All tracking semantics live in
//! the core.

pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::AppState;
