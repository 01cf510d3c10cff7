//! SQLite-backed result store.

pub mod migrations;
pub mod pragmas;
pub mod queries;

use std::path::Path;
use std::sync::Mutex;

use rusqlite::Connection;

use perfwatch_core::errors::StorageError;
use perfwatch_core::types::HistoryRecord;

use crate::store::ResultStore;

/// History in a `history` table; each append is one INSERT.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open a database at the given path, apply pragmas, run migrations.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| StorageError::io(parent, e))?;
        }
        let conn = Connection::open(path).map_err(|e| StorageError::SqliteError {
            message: e.to_string(),
        })?;
        Self::init(conn)
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory().map_err(|e| StorageError::SqliteError {
            message: e.to_string(),
        })?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self, StorageError> {
        pragmas::apply_pragmas(&conn)?;
        migrations::run_migrations(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn with_conn<F, T>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&Connection) -> Result<T, StorageError>,
    {
        let guard = self.conn.lock().map_err(|_| StorageError::SqliteError {
            message: "connection lock poisoned".to_string(),
        })?;
        f(&guard)
    }

    /// Total number of stored runs across all operations.
    pub fn count(&self) -> Result<u64, StorageError> {
        self.with_conn(queries::count_records)
    }
}

impl ResultStore for SqliteStore {
    fn append(&self, record: &HistoryRecord) -> Result<(), StorageError> {
        let id = self.with_conn(|conn| queries::insert_record(conn, record))?;
        tracing::debug!(operation = %record.operation, id, "inserted history record");
        Ok(())
    }

    fn query(&self, operation: &str, limit: usize) -> Result<Vec<HistoryRecord>, StorageError> {
        self.with_conn(|conn| queries::recent_for_operation(conn, operation, limit))
    }
}
