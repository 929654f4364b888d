use thiserror::Error;

/// Statuses the upstream returns for congestion or brief outages.
/// Only these are worth a retry; everything else fails fast.
const TRANSIENT_STATUSES: [u16; 4] = [429, 502, 503, 504];

/// Top-level error type for the `rastro-api` crate.
///
/// Covers every failure mode of a tracking lookup: credential handling,
/// transport, upstream rejections, and response decoding. `rastro-core`
/// maps these into per-code outcomes.
#[derive(Debug, Error)]
pub enum Error {
    /// The configured credential cannot be sent as a header.
    #[error("Authentication setup failed: {message}")]
    Authentication { message: String },

    /// HTTP transport error (connection refused, DNS failure, timeout).
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Non-success status from the upstream, with whatever body it sent.
    #[error("Upstream error (HTTP {status}): {message}")]
    Upstream {
        status: u16,
        message: String,
        details: Option<serde_json::Value>,
    },

    /// The upstream answered 2xx but the envelope did not decode.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// The HTTP status associated with this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Upstream { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns `true` if this failure is worth one retry.
    ///
    /// Only upstream statuses 429/502/503/504 qualify. Timeouts and
    /// network errors are permanent: the per-call deadline has already
    /// been spent, and a dead host does not come back in one backoff.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Upstream { status, .. } => TRANSIENT_STATUSES.contains(status),
            _ => false,
        }
    }
}
