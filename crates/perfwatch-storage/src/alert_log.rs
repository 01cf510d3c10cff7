//! JSONL alert log: one line per emitted alert event.

use std::path::{Path, PathBuf};

use perfwatch_core::errors::StorageError;
use perfwatch_core::traits::AlertSink;
use perfwatch_core::types::AlertEvent;

use crate::jsonl;

/// Append-only alert log. Severity is upper-case on disk, so
/// `grep WARNING alerts.jsonl` finds warnings.
#[derive(Debug, Clone)]
pub struct JsonlAlertLog {
    path: PathBuf,
}

impl JsonlAlertLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn read_all(&self) -> Result<Vec<AlertEvent>, StorageError> {
        jsonl::read_lines(&self.path)
    }
}

impl AlertSink for JsonlAlertLog {
    fn record(&self, event: &AlertEvent) -> Result<(), StorageError> {
        jsonl::append_line(&self.path, event)
    }
}
