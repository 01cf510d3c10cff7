//! Monitor state and alert events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    #[default]
    Ok,
    Alerting,
}

impl AlertStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Alerting => "alerting",
        }
    }
}

/// Durable state of one metric stream, persisted between ticks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorState {
    pub metric: String,
    pub status: AlertStatus,
    pub last_transition_time: Option<DateTime<Utc>>,
    pub last_value: Option<f64>,
    /// When the last alert event was actually emitted (cooldown anchor).
    #[serde(default)]
    pub last_alert_time: Option<DateTime<Utc>>,
}

impl MonitorState {
    /// State of a metric that has never been observed.
    pub fn initial(metric: impl Into<String>) -> Self {
        Self {
            metric: metric.into(),
            status: AlertStatus::Ok,
            last_transition_time: None,
            last_value: None,
            last_alert_time: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Warning,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Warning => "WARNING",
            Self::Critical => "CRITICAL",
        }
    }
}

/// A threshold crossing. Emitted once per OK -> ALERTING edge; a fact, not
/// an entity, so it is only ever appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertEvent {
    pub metric: String,
    pub value: f64,
    pub threshold: f64,
    pub severity: Severity,
    pub timestamp: DateTime<Utc>,
}

/// A tick that found the state lock busy and did nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissedTick {
    pub metric: String,
    pub timestamp: DateTime<Utc>,
    pub lock_timeout_ms: u64,
}
