//! AlertStateMachine: OK/ALERTING with hysteresis and optional cooldown.

use chrono::{DateTime, Utc};
use tracing::info;

use perfwatch_core::config::MetricSettings;
use perfwatch_core::types::{AlertEvent, AlertStatus, MonitorState, Severity};

/// Result of feeding one reading to the machine.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    /// State to persist.
    pub state: MonitorState,
    /// Present only on an emitted OK -> ALERTING edge.
    pub event: Option<AlertEvent>,
    /// An OK -> ALERTING edge happened inside the cooldown window.
    pub suppressed: bool,
}

/// Debounced threshold monitor for one metric stream.
///
/// - OK -> ALERTING when `value > threshold`; the only point an alert is
///   emitted.
/// - ALERTING -> OK when `value <= threshold - hysteresis_margin`.
/// - Anything else keeps the current status.
///
/// Pure: the caller loads and saves the state around each call.
#[derive(Debug, Clone)]
pub struct AlertStateMachine {
    settings: MetricSettings,
}

impl AlertStateMachine {
    pub fn new(settings: MetricSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &MetricSettings {
        &self.settings
    }

    pub fn observe(&self, state: &MonitorState, value: f64, now: DateTime<Utc>) -> Transition {
        let mut next = state.clone();
        next.last_value = Some(value);
        let mut event = None;
        let mut suppressed = false;

        match state.status {
            AlertStatus::Ok if value > self.settings.threshold => {
                next.status = AlertStatus::Alerting;
                next.last_transition_time = Some(now);
                if self.in_cooldown(state.last_alert_time, now) {
                    suppressed = true;
                    info!(
                        metric = %state.metric,
                        value,
                        threshold = self.settings.threshold,
                        "alert suppressed by cooldown"
                    );
                } else {
                    next.last_alert_time = Some(now);
                    event = Some(AlertEvent {
                        metric: state.metric.clone(),
                        value,
                        threshold: self.settings.threshold,
                        severity: self.severity(value),
                        timestamp: now,
                    });
                }
            }
            AlertStatus::Alerting if value <= self.settings.clear_level() => {
                next.status = AlertStatus::Ok;
                next.last_transition_time = Some(now);
            }
            _ => {}
        }

        Transition {
            state: next,
            event,
            suppressed,
        }
    }

    fn severity(&self, value: f64) -> Severity {
        match self.settings.critical_threshold {
            Some(critical) if value >= critical => Severity::Critical,
            _ => Severity::Warning,
        }
    }

    fn in_cooldown(&self, last_alert: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
        let cooldown = self.settings.alert_cooldown;
        match last_alert {
            Some(last) if !cooldown.is_zero() => now
                .signed_duration_since(last)
                .to_std()
                .map_or(true, |elapsed| elapsed < cooldown),
            _ => false,
        }
    }
}
