//! # perfwatch-storage
//!
//! Everything perfwatch writes to disk: the append-only benchmark history
//! (JSONL ledger or SQLite), trend reads over it, per-metric monitor state
//! files guarded by an advisory lock, and the JSONL alert log.

pub mod alert_log;
mod jsonl;
pub mod ledger;
pub mod sqlite;
pub mod state_file;
pub mod store;
pub mod trend;

pub use alert_log::JsonlAlertLog;
pub use ledger::JsonlLedger;
pub use sqlite::SqliteStore;
pub use state_file::{LockedState, MonitorStateStore};
pub use store::{open_store, ResultStore};
pub use trend::{detect_sustained_regression, trend};
