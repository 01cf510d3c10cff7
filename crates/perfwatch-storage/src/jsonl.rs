//! Locked whole-line appends and tolerant reads for JSONL files.

use std::fs::{self, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use perfwatch_core::errors::StorageError;

/// Append `value` as one JSON line.
///
/// The record is serialized up front and written with a single `write_all`
/// under an exclusive advisory lock, then flushed and synced. If the file
/// ends in a torn line from an interrupted writer, a newline is written
/// first so only that earlier line stays unreadable.
pub(crate) fn append_line<T: Serialize>(path: &Path, value: &T) -> Result<(), StorageError> {
    let mut line = serde_json::to_vec(value)?;
    line.push(b'\n');

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| StorageError::io(parent, e))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .read(true)
        .append(true)
        .open(path)
        .map_err(|e| StorageError::io(path, e))?;

    let mut lock = fd_lock::RwLock::new(file);
    let mut guard = lock.write().map_err(|e| StorageError::io(path, e))?;

    if ends_mid_line(&mut guard).map_err(|e| StorageError::io(path, e))? {
        line.insert(0, b'\n');
    }
    guard
        .write_all(&line)
        .and_then(|()| guard.flush())
        .and_then(|()| guard.sync_data())
        .map_err(|e| StorageError::io(path, e))
}

fn ends_mid_line(file: &mut fs::File) -> std::io::Result<bool> {
    if file.metadata()?.len() == 0 {
        return Ok(false);
    }
    file.seek(SeekFrom::End(-1))?;
    let mut last = [0_u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] != b'\n')
}

/// Read every parseable line. Missing file reads as empty; malformed or
/// torn lines are skipped with a warning. Takes no lock.
pub(crate) fn read_lines<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, StorageError> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(StorageError::io(path, e)),
    };
    let content = String::from_utf8_lossy(&bytes);

    let mut values = Vec::new();
    for (index, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<T>(line) {
            Ok(value) => values.push(value),
            Err(e) => warn!(
                path = %path.display(),
                line = index + 1,
                error = %e,
                "skipping malformed JSONL line"
            ),
        }
    }
    Ok(values)
}
