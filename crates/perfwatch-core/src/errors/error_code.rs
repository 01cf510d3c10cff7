//! Stable error codes shared by every perfwatch error enum.

/// Every error enum implements this to expose a machine-readable code.
/// The CLI prints `[CODE] message` so operators can grep for failure classes.
pub trait PerfwatchErrorCode {
    /// Returns the error code string (e.g., "CONFIG_ERROR").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted error string: `[ERROR_CODE] message`.
    fn coded_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const INVALID_TIERS: &str = "INVALID_TIERS";
pub const PROBE_FAILED: &str = "PROBE_FAILED";
pub const PROBE_TIMEOUT: &str = "PROBE_TIMEOUT";
pub const PROBE_PANICKED: &str = "PROBE_PANICKED";
pub const METRIC_UNAVAILABLE: &str = "METRIC_UNAVAILABLE";
pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
pub const MIGRATION_FAILED: &str = "MIGRATION_FAILED";
pub const CORRUPT_RECORD: &str = "CORRUPT_RECORD";
pub const MONITOR_ERROR: &str = "MONITOR_ERROR";
