//! v001: the append-only `history` table.
//!
//! `aggregate_json` holds the full aggregate; `state`, `mean_ms` and
//! `failure_rate` are copied out so the table can be queried directly.

pub const MIGRATION_SQL: &str = "
CREATE TABLE IF NOT EXISTS history (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    operation TEXT NOT NULL,
    recorded_at TEXT NOT NULL,
    state TEXT NOT NULL,
    mean_ms REAL,
    failure_rate REAL NOT NULL,
    aggregate_json TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_history_operation ON history(operation, id);
";
