//! Monitor tick errors. Aggregates subsystem errors via `From` conversions.

use super::error_code::{self, PerfwatchErrorCode};
use super::{ConfigError, StorageError};

/// Errors that abort a monitor tick.
///
/// Metric read failures and lock contention are deliberately absent: the
/// tick absorbs both and reports them as outcomes, not errors.
#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Unknown metric: {metric}")]
    UnknownMetric { metric: String },
}

impl PerfwatchErrorCode for MonitorError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Storage(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
            Self::UnknownMetric { .. } => error_code::MONITOR_ERROR,
        }
    }
}
