//! Per-metric monitor state files with an exclusive advisory lock.
//!
//! Layout under the state directory:
//! - `<metric>.state.json` holds the serialized [`MonitorState`]
//! - `<metric>.lock` is the lock file held across read-modify-write
//! - `<metric>.missed.jsonl` logs ticks skipped because the lock was busy
//!
//! Metric names are single path components; anything that could escape
//! the state directory is rejected.
//!
//! The state file is replaced atomically (temp file in the same directory,
//! then rename), so readers see either the old or the new state.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use perfwatch_core::errors::StorageError;
use perfwatch_core::types::{MissedTick, MonitorState};

use crate::jsonl;

const LOCK_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Directory of monitor state files.
#[derive(Debug, Clone)]
pub struct MonitorStateStore {
    dir: PathBuf,
}

/// Access to one metric's state while its lock is held.
pub struct LockedState<'a> {
    store: &'a MonitorStateStore,
    metric: &'a str,
}

impl MonitorStateStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn state_path(&self, metric: &str) -> PathBuf {
        self.dir.join(format!("{metric}.state.json"))
    }

    pub fn lock_path(&self, metric: &str) -> PathBuf {
        self.dir.join(format!("{metric}.lock"))
    }

    pub fn missed_path(&self, metric: &str) -> PathBuf {
        self.dir.join(format!("{metric}.missed.jsonl"))
    }

    /// Run `f` while holding the metric's exclusive lock.
    ///
    /// Polls for the lock until `timeout` elapses. `Ok(None)` means the lock
    /// stayed busy and `f` never ran. The lock is released when this
    /// returns, on every path.
    pub fn with_exclusive<T, E, F>(
        &self,
        metric: &str,
        timeout: Duration,
        f: F,
    ) -> Result<Option<T>, E>
    where
        E: From<StorageError>,
        F: FnOnce(&LockedState<'_>) -> Result<T, E>,
    {
        check_metric_name(metric)?;
        fs::create_dir_all(&self.dir).map_err(|e| StorageError::io(&self.dir, e))?;
        let lock_path = self.lock_path(metric);
        let lock_file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|e| StorageError::io(&lock_path, e))?;

        let mut lock = fd_lock::RwLock::new(lock_file);
        let deadline = Instant::now() + timeout;
        let _guard = loop {
            match lock.try_write() {
                Ok(guard) => break guard,
                Err(e) if e.kind() == ErrorKind::WouldBlock => {
                    let now = Instant::now();
                    if now >= deadline {
                        debug!(
                            metric,
                            timeout_ms = timeout.as_millis() as u64,
                            path = %lock_path.display(),
                            "state lock busy"
                        );
                        return Ok(None);
                    }
                    thread::sleep(LOCK_POLL_INTERVAL.min(deadline - now));
                }
                Err(e) => return Err(StorageError::io(&lock_path, e).into()),
            }
        };

        let locked = LockedState { store: self, metric };
        f(&locked).map(Some)
    }

    /// Unlocked read of the last saved state, for display.
    pub fn peek(&self, metric: &str) -> Result<Option<MonitorState>, StorageError> {
        check_metric_name(metric)?;
        read_state(&self.state_path(metric))
    }

    /// Log a tick skipped on a busy lock. Returns how many ticks of this
    /// metric have been missed in total.
    ///
    /// The missed-tick log has its own append lock, so this never waits on
    /// the state lock.
    pub fn record_missed(
        &self,
        metric: &str,
        timestamp: DateTime<Utc>,
        lock_timeout: Duration,
    ) -> Result<usize, StorageError> {
        check_metric_name(metric)?;
        let path = self.missed_path(metric);
        let entry = MissedTick {
            metric: metric.to_string(),
            timestamp,
            lock_timeout_ms: lock_timeout.as_millis() as u64,
        };
        jsonl::append_line(&path, &entry)?;
        Ok(jsonl::read_lines::<MissedTick>(&path)?.len())
    }

    pub fn missed_ticks(&self, metric: &str) -> Result<Vec<MissedTick>, StorageError> {
        check_metric_name(metric)?;
        jsonl::read_lines(&self.missed_path(metric))
    }
}

impl LockedState<'_> {
    pub fn metric(&self) -> &str {
        self.metric
    }

    /// The saved state, or the initial OK state if none exists yet.
    ///
    /// An unreadable state file is logged and replaced by the initial
    /// state; the next save overwrites it.
    pub fn load(&self) -> Result<MonitorState, StorageError> {
        let path = self.store.state_path(self.metric);
        match read_state(&path) {
            Ok(Some(state)) => Ok(state),
            Ok(None) => Ok(MonitorState::initial(self.metric)),
            Err(StorageError::CorruptRecord { path, message }) => {
                warn!(
                    metric = self.metric,
                    path = %path,
                    message = %message,
                    "discarding unreadable state file"
                );
                Ok(MonitorState::initial(self.metric))
            }
            Err(e) => Err(e),
        }
    }

    /// Atomically replace the state file.
    pub fn save(&self, state: &MonitorState) -> Result<(), StorageError> {
        let dir = &self.store.dir;
        let path = self.store.state_path(self.metric);
        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| StorageError::io(dir, e))?;
        serde_json::to_writer_pretty(&mut tmp, state)?;
        tmp.write_all(b"\n")
            .and_then(|()| tmp.as_file().sync_data())
            .map_err(|e| StorageError::io(tmp.path(), e))?;
        tmp.persist(&path)
            .map_err(|e| StorageError::io(&path, e.error))?;
        Ok(())
    }
}

fn check_metric_name(metric: &str) -> Result<(), StorageError> {
    let invalid = |message: &str| {
        Err(StorageError::InvalidMetricName {
            metric: metric.to_string(),
            message: message.to_string(),
        })
    };
    if metric.trim().is_empty() {
        return invalid("must not be empty");
    }
    if metric.contains(['/', '\\', '\0']) {
        return invalid("must not contain path separators");
    }
    if metric.contains("..") {
        return invalid("must not contain '..'");
    }
    Ok(())
}

fn read_state(path: &Path) -> Result<Option<MonitorState>, StorageError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(StorageError::io(path, e)),
    };
    serde_json::from_str(&content)
        .map(Some)
        .map_err(|e| StorageError::CorruptRecord {
            path: path.display().to_string(),
            message: e.to_string(),
        })
}
