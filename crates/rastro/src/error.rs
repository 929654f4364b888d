//! CLI error type with process exit codes.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] rastro_config::ConfigError),

    #[error(transparent)]
    Core(#[from] rastro_core::CoreError),

    #[error("too many codes: {given} exceeds the configured maximum of {max}")]
    TooManyCodes { given: usize, max: usize },
}

impl CliError {
    /// sysexits-style codes: 64 for usage errors, 78 for bad config.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::TooManyCodes { .. } => 64,
            Self::Config(_) => 78,
            Self::Core(_) => 1,
        }
    }
}
