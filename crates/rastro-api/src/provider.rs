// The provider capability seam.
//
// The batch dispatcher in rastro-core only ever sees this trait; whether
// lookups hit the real upstream or the simulator is decided once, at
// construction time.

use async_trait::async_trait;

use crate::error::Error;
use crate::types::TrackEnvelope;

/// A source of tracking envelopes, one lookup per code.
///
/// Implementations: [`UpstreamClient`](crate::UpstreamClient) for real
/// network calls, [`SimulatedProvider`](crate::SimulatedProvider) for
/// environments without network access.
#[async_trait]
pub trait TrackingProvider: Send + Sync {
    /// Look up a single tracking code.
    async fn track(&self, code: &str) -> Result<TrackEnvelope, Error>;
}
