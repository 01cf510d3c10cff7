//! Errors surfaced by the `perfwatch` binary.

use perfwatch_core::errors::error_code::{self, PerfwatchErrorCode};
use perfwatch_core::errors::{ConfigError, MonitorError, StorageError};

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Monitor(#[from] MonitorError),

    #[error("Invalid arguments: {0}")]
    Usage(String),

    #[error("Could not render output: {0}")]
    Output(#[from] serde_json::Error),
}

impl PerfwatchErrorCode for CliError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Config(e) => e.error_code(),
            Self::Storage(e) => e.error_code(),
            Self::Monitor(e) => e.error_code(),
            Self::Usage(_) => error_code::CONFIG_ERROR,
            Self::Output(_) => error_code::STORAGE_ERROR,
        }
    }
}
