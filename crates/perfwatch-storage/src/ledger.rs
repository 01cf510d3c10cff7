//! JSONL history ledger, one record per line.

use std::path::{Path, PathBuf};

use perfwatch_core::errors::StorageError;
use perfwatch_core::types::HistoryRecord;

use crate::jsonl;
use crate::store::ResultStore;

/// Append-only ledger that stores one JSON record per line.
/// Readable by anything that reads JSONL while a writer is active.
#[derive(Debug, Clone)]
pub struct JsonlLedger {
    path: PathBuf,
}

impl JsonlLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every readable record, in file order.
    pub fn read_all(&self) -> Result<Vec<HistoryRecord>, StorageError> {
        jsonl::read_lines(&self.path)
    }
}

impl ResultStore for JsonlLedger {
    fn append(&self, record: &HistoryRecord) -> Result<(), StorageError> {
        jsonl::append_line(&self.path, record)?;
        tracing::debug!(
            operation = %record.operation,
            path = %self.path.display(),
            "appended history record"
        );
        Ok(())
    }

    fn query(&self, operation: &str, limit: usize) -> Result<Vec<HistoryRecord>, StorageError> {
        let mut matching: Vec<HistoryRecord> = self
            .read_all()?
            .into_iter()
            .filter(|r| r.operation == operation)
            .collect();
        let start = matching.len().saturating_sub(limit);
        Ok(matching.split_off(start))
    }
}
