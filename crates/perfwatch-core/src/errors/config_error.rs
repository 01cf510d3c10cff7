//! Configuration errors.

use super::error_code::{self, PerfwatchErrorCode};

/// Errors that can occur during configuration loading and validation.
/// All of these are fatal before any sampling starts.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file not found: {path}")]
    FileNotFound { path: String },

    #[error("Config parse error in {path}: {message}")]
    ParseError { path: String, message: String },

    #[error("Config validation failed for {field}: {message}")]
    ValidationFailed { field: String, message: String },

    #[error("Invalid tier list for {field}: {message}")]
    InvalidTiers { field: String, message: String },
}

impl PerfwatchErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidTiers { .. } => error_code::INVALID_TIERS,
            _ => error_code::CONFIG_ERROR,
        }
    }
}
