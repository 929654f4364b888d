//! Shared handler state.

use rastro_core::BatchTracker;

/// Everything the handlers need, behind one `Arc` in the router.
pub struct AppState {
    pub tracker: BatchTracker,
    /// Boundary limit on codes per batch request.
    pub max_codes: usize,
    /// Reported by the health endpoint.
    pub simulation: bool,
}
