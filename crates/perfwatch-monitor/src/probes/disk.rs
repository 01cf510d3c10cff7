//! Filesystem usage via `statvfs(3)`.

use std::path::PathBuf;

use perfwatch_core::errors::ProbeError;
use perfwatch_core::traits::MetricProbe;

use super::DISK_METRIC;

const DEFAULT_PATH: &str = "/";

/// Used space on the filesystem holding `path`, as `df` reports it.
#[derive(Debug, Clone)]
pub struct DiskUsageProbe {
    path: PathBuf,
}

impl DiskUsageProbe {
    pub fn new() -> Self {
        Self::with_path(DEFAULT_PATH)
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Default for DiskUsageProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricProbe for DiskUsageProbe {
    fn metric(&self) -> &str {
        DISK_METRIC
    }

    #[cfg(unix)]
    fn read(&self) -> Result<f64, ProbeError> {
        let stat = nix::sys::statvfs::statvfs(self.path.as_path()).map_err(|e| {
            ProbeError::metric_unavailable(DISK_METRIC, format!("{}: {e}", self.path.display()))
        })?;
        used_percent(
            stat.blocks() as u64,
            stat.blocks_free() as u64,
            stat.blocks_available() as u64,
        )
        .ok_or_else(|| ProbeError::metric_unavailable(DISK_METRIC, "filesystem reports no blocks"))
    }

    #[cfg(not(unix))]
    fn read(&self) -> Result<f64, ProbeError> {
        Err(ProbeError::metric_unavailable(
            DISK_METRIC,
            "statvfs is not available on this platform",
        ))
    }
}

/// `used / (used + available) * 100`, where blocks reserved for root count
/// as neither. Matches the `Use%` column of `df`.
pub fn used_percent(blocks: u64, free: u64, available: u64) -> Option<f64> {
    let used = blocks.checked_sub(free)?;
    let usable = used + available;
    if usable == 0 {
        return None;
    }
    Some((used as f64 / usable as f64 * 100.0).clamp(0.0, 100.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_blocks_are_excluded() {
        // 1000 blocks, 250 free of which 200 are reserved for root.
        assert_eq!(used_percent(1000, 250, 50), Some(93.75));
        assert_eq!(used_percent(1000, 500, 500), Some(50.0));
    }

    #[test]
    fn empty_or_inconsistent_is_unavailable() {
        assert_eq!(used_percent(0, 0, 0), None);
        assert_eq!(used_percent(10, 20, 5), None);
    }

    #[cfg(unix)]
    #[test]
    fn reads_the_root_filesystem() {
        let value = DiskUsageProbe::new().read().unwrap();
        assert!((0.0..=100.0).contains(&value), "{value}");
    }

    #[test]
    fn missing_path_is_unavailable() {
        let probe = DiskUsageProbe::with_path("/perfwatch/no/such/mount");
        assert!(matches!(
            probe.read(),
            Err(ProbeError::MetricUnavailable { .. })
        ));
    }
}
