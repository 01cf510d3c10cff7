//! Top-level perfwatch configuration with layered resolution.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{BenchConfig, BenchSettings, MonitorConfig, MonitorSettings, StorageConfig};
use crate::errors::ConfigError;

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "perfwatch.toml";

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. CLI flags (applied via `apply_cli_overrides`)
/// 2. Environment variables (`PERFWATCH_*`)
/// 3. Config file (`--config`, else `perfwatch.toml` in the working directory)
/// 4. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PerfwatchConfig {
    pub bench: BenchConfig,
    pub monitor: MonitorConfig,
    pub storage: StorageConfig,
}

/// CLI override arguments that can be applied to a config.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub iterations: Option<u32>,
    pub warmup: Option<u32>,
    pub tolerance: Option<f64>,
    pub history_path: Option<PathBuf>,
}

impl PerfwatchConfig {
    /// Load configuration with layered resolution and validate it.
    ///
    /// An explicit `path` must exist; the implicit `perfwatch.toml` is
    /// optional. Validation failures (including malformed tier lists) are
    /// returned here, before any sampling can start.
    pub fn load(path: Option<&Path>, cli: Option<&CliOverrides>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let implicit = Path::new(DEFAULT_CONFIG_FILE);
                if implicit.exists() {
                    Self::from_file(implicit)?
                } else {
                    Self::default()
                }
            }
        };

        config.apply_env_overrides();
        if let Some(cli) = cli {
            config.apply_cli_overrides(cli);
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Read and parse a TOML file. Unknown keys are ignored.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Validate every section by resolving it.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.bench.settings()?;
        self.monitor.settings()?;
        Ok(())
    }

    pub fn bench_settings(&self) -> Result<BenchSettings, ConfigError> {
        self.bench.settings()
    }

    pub fn monitor_settings(&self) -> Result<MonitorSettings, ConfigError> {
        self.monitor.settings()
    }

    /// Apply environment variable overrides.
    /// Pattern: `PERFWATCH_BENCH_ITERATIONS`, `PERFWATCH_MONITOR_THRESHOLD`, etc.
    /// Unparseable values are ignored with a warning.
    fn apply_env_overrides(&mut self) {
        if let Some(v) = env_parse::<u32>("PERFWATCH_BENCH_ITERATIONS") {
            self.bench.iterations = Some(v);
        }
        if let Some(v) = env_parse::<u32>("PERFWATCH_BENCH_WARMUP") {
            self.bench.warmup = Some(v);
        }
        if let Some(v) = env_parse::<f64>("PERFWATCH_BENCH_TOLERANCE") {
            self.bench.tolerance = Some(v);
        }
        if let Some(v) = env_parse::<f64>("PERFWATCH_BENCH_FAILURE_CEILING") {
            self.bench.failure_ceiling = Some(v);
        }
        if let Some(v) = env_parse::<f64>("PERFWATCH_MONITOR_THRESHOLD") {
            self.monitor.threshold = Some(v);
        }
        if let Some(v) = env_parse::<f64>("PERFWATCH_MONITOR_HYSTERESIS_MARGIN") {
            self.monitor.hysteresis_margin = Some(v);
        }
        if let Ok(val) = std::env::var("PERFWATCH_STORAGE_HISTORY_PATH") {
            self.storage.history_path = Some(PathBuf::from(val));
        }
    }

    /// Apply CLI overrides (highest priority).
    fn apply_cli_overrides(&mut self, cli: &CliOverrides) {
        if let Some(v) = cli.iterations {
            self.bench.iterations = Some(v);
        }
        if let Some(v) = cli.warmup {
            self.bench.warmup = Some(v);
        }
        if let Some(v) = cli.tolerance {
            self.bench.tolerance = Some(v);
        }
        if let Some(ref v) = cli.history_path {
            self.storage.history_path = Some(v.clone());
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    let val = std::env::var(key).ok()?;
    match val.parse::<T>() {
        Ok(v) => Some(v),
        Err(_) => {
            ::tracing::warn!(key, value = %val, "ignoring unparseable environment override");
            None
        }
    }
}
