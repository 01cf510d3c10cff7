//! Trend over a window of history records.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Faster,
    Slower,
    Stable,
}

impl TrendDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Faster => "faster",
            Self::Slower => "slower",
            Self::Stable => "stable",
        }
    }
}

/// Oldest versus newest computed mean in a queried window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trend {
    pub operation: String,
    /// Records with a computed mean that fell inside the window.
    pub runs: usize,
    pub oldest_mean: f64,
    pub newest_mean: f64,
    /// `(newest - oldest) / oldest`; positive means slower.
    pub change_ratio: f64,
    pub direction: TrendDirection,
}
