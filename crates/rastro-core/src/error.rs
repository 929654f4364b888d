// ── Core error types ──
//
// Failures of the batch call itself -- wiring and configuration, not
// per-code lookups. Per-code failures never surface here; they are
// folded into `TrackResult::error` by the dispatcher.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Upstream client error: {message}")]
    Provider {
        message: String,
        status: Option<u16>,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<rastro_api::Error> for CoreError {
    fn from(err: rastro_api::Error) -> Self {
        match err {
            rastro_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("invalid upstream URL: {e}"),
            },
            rastro_api::Error::Authentication { message } => CoreError::Config { message },
            other => {
                let status = other.status();
                CoreError::Provider {
                    message: other.to_string(),
                    status,
                }
            }
        }
    }
}
