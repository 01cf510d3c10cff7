//! The ResultStore seam and backend selection.

use perfwatch_core::config::{StorageBackend, StorageConfig};
use perfwatch_core::errors::StorageError;
use perfwatch_core::types::HistoryRecord;

use crate::ledger::JsonlLedger;
use crate::sqlite::SqliteStore;

/// Append-only history of benchmark runs.
pub trait ResultStore: Send + Sync {
    /// Persist one record. Records are never updated or deleted.
    fn append(&self, record: &HistoryRecord) -> Result<(), StorageError>;

    /// The most recent `limit` records for `operation`, oldest first.
    fn query(&self, operation: &str, limit: usize) -> Result<Vec<HistoryRecord>, StorageError>;
}

/// Open the configured backend at the configured path.
pub fn open_store(config: &StorageConfig) -> Result<Box<dyn ResultStore>, StorageError> {
    let path = config.effective_history_path();
    tracing::debug!(
        backend = ?config.effective_backend(),
        path = %path.display(),
        "opening result store"
    );
    Ok(match config.effective_backend() {
        StorageBackend::Jsonl => Box::new(JsonlLedger::new(path)),
        StorageBackend::Sqlite => Box::new(SqliteStore::open(&path)?),
    })
}
