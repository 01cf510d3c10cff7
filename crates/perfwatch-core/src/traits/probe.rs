//! Probes: the operation under measurement and the metric under watch.

use crate::errors::ProbeError;

/// An operation whose wall-clock duration is sampled.
///
/// `Send + Sync` because the sampler may run calls on a worker thread to
/// enforce a per-call timeout.
pub trait Probe: Send + Sync {
    fn call(&self) -> Result<(), ProbeError>;
}

impl<F> Probe for F
where
    F: Fn() -> Result<(), ProbeError> + Send + Sync,
{
    fn call(&self) -> Result<(), ProbeError> {
        self()
    }
}

/// A live metric read once per monitor tick.
pub trait MetricProbe: Send + Sync {
    /// Metric name used for state files and alert events.
    fn metric(&self) -> &str;

    fn read(&self) -> Result<f64, ProbeError>;
}
