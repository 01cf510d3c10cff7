//! A single measurement.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One timed call or one metric reading.
///
/// Failed attempts keep the elapsed time they consumed in `value` but carry
/// `ok = false`; they are excluded from statistics and count toward the
/// failure rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub operation: String,
    /// Milliseconds for timed calls, metric units for monitor readings.
    pub value: f64,
    pub timestamp: DateTime<Utc>,
    pub ok: bool,
}

impl Sample {
    pub fn success(operation: impl Into<String>, value: f64, timestamp: DateTime<Utc>) -> Self {
        debug_assert!(value >= 0.0, "negative sample value {value}");
        Self {
            operation: operation.into(),
            value,
            timestamp,
            ok: true,
        }
    }

    pub fn failure(operation: impl Into<String>, value: f64, timestamp: DateTime<Utc>) -> Self {
        debug_assert!(value >= 0.0, "negative sample value {value}");
        Self {
            operation: operation.into(),
            value,
            timestamp,
            ok: false,
        }
    }
}
