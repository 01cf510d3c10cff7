//! Baseline-versus-candidate comparison outcome.

use serde::{Deserialize, Serialize};

use super::AggregateResult;

/// The comparator's classification of a baseline-vs-candidate change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Improved,
    Regressed,
    Unchanged,
    InsufficientData,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Improved => "improved",
            Self::Regressed => "regressed",
            Self::Unchanged => "unchanged",
            Self::InsufficientData => "insufficient_data",
        }
    }
}

/// How large an improvement is, judged from candidate/baseline mean ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Impact {
    /// Candidate takes less than half the baseline time.
    Major,
    /// Candidate takes less than 80% of the baseline time.
    Moderate,
    Minimal,
}

impl Impact {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Major => "major",
            Self::Moderate => "moderate",
            Self::Minimal => "minimal",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub operation: String,
    pub baseline: AggregateResult,
    pub candidate: AggregateResult,
    /// `(baseline.mean - candidate.mean) / baseline.mean`; positive is faster.
    pub improvement_ratio: Option<f64>,
    pub verdict: Verdict,
    pub tolerance: f64,
    pub impact: Option<Impact>,
    /// `baseline.mean - candidate.mean` in milliseconds.
    pub mean_delta_ms: Option<f64>,
    /// Two-sided Welch t-test p-value, when both sides carry variance.
    pub p_value: Option<f64>,
}

impl ComparisonResult {
    /// Time saved over `calls` invocations at the measured means.
    pub fn projected_savings_ms(&self, calls: u64) -> Option<f64> {
        self.mean_delta_ms.map(|d| d * calls as f64)
    }

    pub fn is_significant(&self, alpha: f64) -> bool {
        self.p_value.is_some_and(|p| p < alpha)
    }
}
