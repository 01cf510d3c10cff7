//! History storage configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub const DEFAULT_HISTORY_PATH: &str = "perfwatch-history.jsonl";

/// Which result store backs the benchmark history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Jsonl,
    Sqlite,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StorageConfig {
    /// Default: jsonl.
    pub backend: Option<StorageBackend>,
    /// Default: "perfwatch-history.jsonl".
    pub history_path: Option<PathBuf>,
}

impl StorageConfig {
    pub fn effective_backend(&self) -> StorageBackend {
        self.backend.unwrap_or_default()
    }

    pub fn effective_history_path(&self) -> PathBuf {
        self.history_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_HISTORY_PATH))
    }
}
