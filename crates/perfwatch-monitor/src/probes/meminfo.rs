//! Memory usage from `/proc/meminfo`.

use std::path::PathBuf;

use perfwatch_core::errors::ProbeError;
use perfwatch_core::traits::MetricProbe;

use super::MEMORY_METRIC;

const DEFAULT_PATH: &str = "/proc/meminfo";

/// Used memory as a percentage of `MemTotal`.
#[derive(Debug, Clone)]
pub struct MemInfoProbe {
    path: PathBuf,
}

impl MemInfoProbe {
    pub fn new() -> Self {
        Self::with_path(DEFAULT_PATH)
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Default for MemInfoProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricProbe for MemInfoProbe {
    fn metric(&self) -> &str {
        MEMORY_METRIC
    }

    fn read(&self) -> Result<f64, ProbeError> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            ProbeError::metric_unavailable(MEMORY_METRIC, format!("{}: {e}", self.path.display()))
        })?;
        used_percent(&content).ok_or_else(|| {
            ProbeError::metric_unavailable(MEMORY_METRIC, "MemTotal missing or zero")
        })
    }
}

/// `(MemTotal - MemAvailable) / MemTotal * 100`, with `MemFree` standing in
/// for `MemAvailable` on kernels that do not report it.
pub fn used_percent(meminfo: &str) -> Option<f64> {
    let mut total = None;
    let mut available = None;
    let mut free = None;
    for line in meminfo.lines() {
        let mut parts = line.split_whitespace();
        let (Some(key), Some(value)) = (parts.next(), parts.next()) else {
            continue;
        };
        let Ok(kb) = value.parse::<u64>() else {
            continue;
        };
        match key {
            "MemTotal:" => total = Some(kb),
            "MemAvailable:" => available = Some(kb),
            "MemFree:" => free = Some(kb),
            _ => {}
        }
    }

    let total = total.filter(|t| *t > 0)? as f64;
    let available = available.or(free)? as f64;
    Some(((total - available) / total * 100.0).clamp(0.0, 100.0))
}
