//! Storage errors: history ledger, SQLite store, state file and alert log.

use super::error_code::{self, PerfwatchErrorCode};

/// Errors raised by the persistence layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("SQLite error: {message}")]
    SqliteError { message: String },

    #[error("Migration to v{version} failed: {message}")]
    MigrationFailed { version: u32, message: String },

    #[error("Serialization error: {message}")]
    Serialization { message: String },

    #[error("Corrupt record in {path}: {message}")]
    CorruptRecord { path: String, message: String },

    #[error("Invalid metric name {metric:?}: {message}")]
    InvalidMetricName { metric: String, message: String },
}

impl StorageError {
    pub fn io(path: impl AsRef<std::path::Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().display().to_string(),
            source,
        }
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization {
            message: e.to_string(),
        }
    }
}

impl PerfwatchErrorCode for StorageError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::MigrationFailed { .. } => error_code::MIGRATION_FAILED,
            Self::CorruptRecord { .. } => error_code::CORRUPT_RECORD,
            _ => error_code::STORAGE_ERROR,
        }
    }
}
