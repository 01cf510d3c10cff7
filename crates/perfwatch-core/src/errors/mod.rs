//! Error handling for perfwatch.
//! One error enum per subsystem, `thiserror` only.

pub mod config_error;
pub mod error_code;
pub mod monitor_error;
pub mod probe_error;
pub mod storage_error;

pub use config_error::ConfigError;
pub use error_code::PerfwatchErrorCode;
pub use monitor_error::MonitorError;
pub use probe_error::ProbeError;
pub use storage_error::StorageError;
