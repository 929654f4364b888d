// ── Runtime tracker configuration ──
//
// Describes *how* one service instance talks to the upstream. Carries
// the credential and tuning values, but never touches disk -- the
// binaries resolve files/env through rastro-config and hand this in.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

/// The provider's labs endpoint; overridable but stable in practice.
pub const DEFAULT_UPSTREAM_URL: &str =
    "https://api-labs.wonca.com.br/wonca.labs.v1.LabsService/Track";

/// Configuration for one batch-tracking service instance.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Fixed upstream endpoint receiving `POST { "code": … }`.
    pub upstream_url: Url,
    /// `Authorization` header value (`Apikey <token>`). Required in real
    /// mode, unused in simulation mode.
    pub credential: Option<SecretString>,
    /// Per-call deadline for upstream lookups.
    pub timeout: Duration,
    /// Most codes one batch call may carry; enforced at the boundary.
    pub max_codes: usize,
    /// Concurrent in-flight lookups per batch (1 = sequential).
    pub concurrency: usize,
    /// Use the simulated provider instead of the network.
    pub simulation: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            upstream_url: DEFAULT_UPSTREAM_URL
                .parse()
                .expect("default upstream URL is valid"),
            credential: None,
            timeout: Duration::from_millis(15_000),
            max_codes: 200,
            concurrency: 1,
            simulation: false,
        }
    }
}
