//! Queries for the history table.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use perfwatch_core::errors::StorageError;
use perfwatch_core::types::{AggregateResult, HistoryRecord};

fn sqlite_err(e: rusqlite::Error) -> StorageError {
    StorageError::SqliteError {
        message: e.to_string(),
    }
}

/// Insert one run. Returns the row id.
pub fn insert_record(conn: &Connection, record: &HistoryRecord) -> Result<i64, StorageError> {
    let aggregate_json = serde_json::to_string(&record.aggregate)?;
    let state = if record.aggregate.is_insufficient() {
        "insufficient_data"
    } else {
        "computed"
    };
    conn.prepare_cached(
        "INSERT INTO history (operation, recorded_at, state, mean_ms, failure_rate, aggregate_json)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )
    .and_then(|mut stmt| {
        stmt.execute(params![
            record.operation,
            record.timestamp.to_rfc3339(),
            state,
            record.aggregate.mean(),
            record.aggregate.failure_rate(),
            aggregate_json,
        ])
    })
    .map_err(sqlite_err)?;
    Ok(conn.last_insert_rowid())
}

/// The most recent `limit` runs of `operation`, oldest first.
pub fn recent_for_operation(
    conn: &Connection,
    operation: &str,
    limit: usize,
) -> Result<Vec<HistoryRecord>, StorageError> {
    let limit = i64::try_from(limit).unwrap_or(i64::MAX);
    let mut stmt = conn
        .prepare_cached(
            "SELECT id, recorded_at, aggregate_json FROM history
             WHERE operation = ?1 ORDER BY id DESC LIMIT ?2",
        )
        .map_err(sqlite_err)?;
    let rows = stmt
        .query_map(params![operation, limit], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })
        .map_err(sqlite_err)?;

    let mut records = Vec::new();
    for row in rows {
        let (id, recorded_at, aggregate_json) = row.map_err(sqlite_err)?;
        let corrupt = |message: String| StorageError::CorruptRecord {
            path: format!("history#{id}"),
            message,
        };
        let timestamp = DateTime::parse_from_rfc3339(&recorded_at)
            .map_err(|e| corrupt(format!("bad timestamp: {e}")))?
            .with_timezone(&Utc);
        let aggregate: AggregateResult = serde_json::from_str(&aggregate_json)
            .map_err(|e| corrupt(format!("bad aggregate: {e}")))?;
        records.push(HistoryRecord {
            operation: operation.to_string(),
            timestamp,
            aggregate,
        });
    }
    records.reverse();
    Ok(records)
}

pub fn count_records(conn: &Connection) -> Result<u64, StorageError> {
    conn.query_row("SELECT COUNT(*) FROM history", [], |row| row.get::<_, i64>(0))
        .map(|n| n.max(0) as u64)
        .map_err(sqlite_err)
}
