//! CPU load from `/proc/loadavg`, normalised by core count.

use std::path::PathBuf;

use perfwatch_core::errors::ProbeError;
use perfwatch_core::traits::MetricProbe;

use super::LOAD_METRIC;

const DEFAULT_PATH: &str = "/proc/loadavg";

/// One-minute load average as a percentage of available cores.
#[derive(Debug, Clone)]
pub struct LoadAverageProbe {
    path: PathBuf,
    cores: usize,
}

impl LoadAverageProbe {
    pub fn new() -> Self {
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        Self::with_path(DEFAULT_PATH, cores)
    }

    pub fn with_path(path: impl Into<PathBuf>, cores: usize) -> Self {
        Self {
            path: path.into(),
            cores: cores.max(1),
        }
    }
}

impl Default for LoadAverageProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricProbe for LoadAverageProbe {
    fn metric(&self) -> &str {
        LOAD_METRIC
    }

    fn read(&self) -> Result<f64, ProbeError> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            ProbeError::metric_unavailable(LOAD_METRIC, format!("{}: {e}", self.path.display()))
        })?;
        let load = one_minute_load(&content)
            .ok_or_else(|| ProbeError::metric_unavailable(LOAD_METRIC, "malformed loadavg"))?;
        Ok(load / self.cores as f64 * 100.0)
    }
}

/// First field of `/proc/loadavg`.
pub fn one_minute_load(loadavg: &str) -> Option<f64> {
    loadavg
        .split_whitespace()
        .next()?
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
}
