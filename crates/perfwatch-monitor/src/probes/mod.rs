//! Metric probes for the monitor tick.

pub mod command;
pub mod disk;
pub mod loadavg;
pub mod meminfo;

pub use command::CommandMetricProbe;
pub use disk::DiskUsageProbe;
pub use loadavg::LoadAverageProbe;
pub use meminfo::MemInfoProbe;

use std::sync::Arc;

use perfwatch_core::traits::MetricProbe;

pub const MEMORY_METRIC: &str = "memory";
pub const LOAD_METRIC: &str = "load";
pub const DISK_METRIC: &str = "disk";

/// The built-in probe for `metric`, if there is one.
pub fn builtin_probe(metric: &str) -> Option<Arc<dyn MetricProbe>> {
    match metric {
        MEMORY_METRIC => Some(Arc::new(MemInfoProbe::new())),
        LOAD_METRIC => Some(Arc::new(LoadAverageProbe::new())),
        DISK_METRIC => Some(Arc::new(DiskUsageProbe::new())),
        _ => None,
    }
}
