//! Configuration system for perfwatch.
//! TOML-based, 3-layer resolution: CLI > env > config file > defaults.
//!
//! Raw `*Config` structs mirror the file format with optional fields;
//! `*Settings` structs are the validated, fully-resolved form that the
//! harness components receive by reference.

pub mod bench_config;
pub mod monitor_config;
pub mod perfwatch_config;
pub mod storage_config;

pub use bench_config::{BenchConfig, BenchSettings, OperationConfig};
pub use monitor_config::{MetricConfig, MetricSettings, MonitorConfig, MonitorSettings};
pub use perfwatch_config::{CliOverrides, PerfwatchConfig};
pub use storage_config::{StorageBackend, StorageConfig};
