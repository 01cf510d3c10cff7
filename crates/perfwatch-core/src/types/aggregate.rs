//! Aggregated statistics with an explicit "insufficient data" state.

use serde::{Deserialize, Serialize};

/// Why no statistic could be produced for a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InsufficientReason {
    /// Every attempt failed, or there were no attempts at all.
    NoSuccessfulSamples,
    /// Enough calls failed that the surviving statistics would mislead.
    FailureRateExceeded { ceiling: f64 },
}

impl std::fmt::Display for InsufficientReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoSuccessfulSamples => f.write_str("no successful samples"),
            Self::FailureRateExceeded { ceiling } => {
                write!(f, "failure rate above ceiling {:.1}%", ceiling * 100.0)
            }
        }
    }
}

/// Statistics over the successful samples of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateStats {
    pub operation: String,
    /// Successful samples.
    pub count: usize,
    /// Failed samples.
    pub failures: usize,
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    /// Sample standard deviation (N-1); zero for a single sample.
    pub stddev: f64,
    pub failure_rate: f64,
}

/// A run for which no valid statistic exists. Distinct from a zero mean.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsufficientData {
    pub operation: String,
    pub count: usize,
    pub failures: usize,
    pub failure_rate: f64,
    pub reason: InsufficientReason,
}

/// Result of aggregating one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum AggregateResult {
    Computed(AggregateStats),
    InsufficientData(InsufficientData),
}

impl AggregateResult {
    pub fn operation(&self) -> &str {
        match self {
            Self::Computed(s) => &s.operation,
            Self::InsufficientData(d) => &d.operation,
        }
    }

    pub fn failure_rate(&self) -> f64 {
        match self {
            Self::Computed(s) => s.failure_rate,
            Self::InsufficientData(d) => d.failure_rate,
        }
    }

    /// Successful sample count.
    pub fn count(&self) -> usize {
        match self {
            Self::Computed(s) => s.count,
            Self::InsufficientData(d) => d.count,
        }
    }

    pub fn failures(&self) -> usize {
        match self {
            Self::Computed(s) => s.failures,
            Self::InsufficientData(d) => d.failures,
        }
    }

    pub fn stats(&self) -> Option<&AggregateStats> {
        match self {
            Self::Computed(s) => Some(s),
            Self::InsufficientData(_) => None,
        }
    }

    /// The primary value used for classification and comparison.
    pub fn mean(&self) -> Option<f64> {
        self.stats().map(|s| s.mean)
    }

    pub fn is_insufficient(&self) -> bool {
        matches!(self, Self::InsufficientData(_))
    }

    pub fn insufficient_reason(&self) -> Option<InsufficientReason> {
        match self {
            Self::Computed(_) => None,
            Self::InsufficientData(d) => Some(d.reason),
        }
    }
}
