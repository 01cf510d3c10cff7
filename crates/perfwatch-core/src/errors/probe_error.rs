//! Probe errors: a benchmarked call or a metric read that did not succeed.

use std::time::Duration;

use super::error_code::{self, PerfwatchErrorCode};

/// Failure of a single probe invocation.
///
/// The sampler never propagates these; they become `ok = false` samples.
/// The monitor tick logs them and leaves its state untouched.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProbeError {
    #[error("probe failed: {message}")]
    Failed { message: String },

    #[error("probe timed out after {}ms", .timeout.as_millis())]
    TimedOut { timeout: Duration },

    #[error("probe panicked: {message}")]
    Panicked { message: String },

    #[error("metric {metric} unavailable: {message}")]
    MetricUnavailable { metric: String, message: String },
}

impl ProbeError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
        }
    }

    pub fn metric_unavailable(metric: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MetricUnavailable {
            metric: metric.into(),
            message: message.into(),
        }
    }
}

impl PerfwatchErrorCode for ProbeError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Failed { .. } => error_code::PROBE_FAILED,
            Self::TimedOut { .. } => error_code::PROBE_TIMEOUT,
            Self::Panicked { .. } => error_code::PROBE_PANICKED,
            Self::MetricUnavailable { .. } => error_code::METRIC_UNAVAILABLE,
        }
    }
}
