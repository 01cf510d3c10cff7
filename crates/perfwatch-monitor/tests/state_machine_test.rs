//! Alert state machine transitions.

use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use perfwatch_core::config::MetricSettings;
use perfwatch_core::types::{AlertStatus, MonitorState, Severity};
use perfwatch_monitor::AlertStateMachine;
use proptest::prelude::*;

fn at(minute: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap() + chrono::Duration::minutes(minute)
}

/// Feed `readings` one per 5-minute tick; returns statuses and event values.
fn run(machine: &AlertStateMachine, readings: &[f64]) -> (Vec<AlertStatus>, Vec<f64>) {
    let mut state = MonitorState::initial("memory");
    let mut statuses = Vec::new();
    let mut events = Vec::new();
    for (i, value) in readings.iter().enumerate() {
        let transition = machine.observe(&state, *value, at(i as i64 * 5));
        if let Some(event) = transition.event {
            events.push(event.value);
        }
        state = transition.state;
        statuses.push(state.status);
    }
    (statuses, events)
}

#[test]
fn hysteresis_sequence_raises_exactly_once() {
    let machine = AlertStateMachine::new(MetricSettings::new("memory", 90.0, 5.0));
    let (statuses, events) = run(&machine, &[50.0, 92.0, 93.0, 94.0, 80.0, 70.0]);

    use AlertStatus::{Alerting, Ok};
    assert_eq!(statuses, vec![Ok, Alerting, Alerting, Alerting, Ok, Ok]);
    assert_eq!(events, vec![92.0]);
}

#[test]
fn value_between_clear_level_and_threshold_keeps_alerting() {
    let machine = AlertStateMachine::new(MetricSettings::new("memory", 90.0, 5.0));
    let (statuses, events) = run(&machine, &[91.0, 86.0, 89.9, 90.0, 85.0, 91.0]);

    use AlertStatus::{Alerting, Ok};
    // 85.0 is exactly threshold - margin and clears; 91.0 re-arms.
    assert_eq!(statuses, vec![Alerting, Alerting, Alerting, Alerting, Ok, Alerting]);
    assert_eq!(events, vec![91.0, 91.0]);
}

#[test]
fn reading_equal_to_threshold_does_not_raise() {
    let machine = AlertStateMachine::new(MetricSettings::new("memory", 90.0, 5.0));
    let (statuses, events) = run(&machine, &[90.0]);
    assert_eq!(statuses, vec![AlertStatus::Ok]);
    assert!(events.is_empty());
}

#[test]
fn transition_records_times_and_value() {
    let machine = AlertStateMachine::new(MetricSettings::new("memory", 90.0, 5.0));
    let start = MonitorState::initial("memory");

    let raised = machine.observe(&start, 95.0, at(0));
    assert_eq!(raised.state.last_transition_time, Some(at(0)));
    assert_eq!(raised.state.last_alert_time, Some(at(0)));
    assert_eq!(raised.state.last_value, Some(95.0));
    let event = raised.event.unwrap();
    assert_eq!(event.metric, "memory");
    assert_eq!(event.threshold, 90.0);
    assert_eq!(event.severity, Severity::Warning);

    let held = machine.observe(&raised.state, 93.0, at(5));
    assert_eq!(held.state.last_transition_time, Some(at(0)));
    assert_eq!(held.state.last_value, Some(93.0));
    assert!(held.event.is_none());
}

#[test]
fn critical_threshold_sets_severity() {
    let mut settings = MetricSettings::new("memory", 85.0, 5.0);
    settings.critical_threshold = Some(95.0);
    let machine = AlertStateMachine::new(settings);

    let warning = machine.observe(&MonitorState::initial("memory"), 90.0, at(0));
    assert_eq!(warning.event.unwrap().severity, Severity::Warning);

    let critical = machine.observe(&MonitorState::initial("memory"), 95.0, at(0));
    assert_eq!(critical.event.unwrap().severity, Severity::Critical);
}

#[test]
fn cooldown_suppresses_rapid_re_raise() {
    let mut settings = MetricSettings::new("memory", 90.0, 5.0);
    settings.alert_cooldown = Duration::from_secs(30 * 60);
    let machine = AlertStateMachine::new(settings);

    // Ticks every 5 minutes: raise, clear, re-raise within 30 minutes.
    let mut state = MonitorState::initial("memory");
    let first = machine.observe(&state, 95.0, at(0));
    assert!(first.event.is_some());
    state = machine.observe(&first.state, 50.0, at(5)).state;

    let second = machine.observe(&state, 95.0, at(10));
    assert_eq!(second.state.status, AlertStatus::Alerting);
    assert!(second.event.is_none());
    assert!(second.suppressed);
    assert_eq!(second.state.last_alert_time, Some(at(0)));

    state = machine.observe(&second.state, 50.0, at(15)).state;
    let third = machine.observe(&state, 95.0, at(40));
    assert!(third.event.is_some());
    assert!(!third.suppressed);
}

proptest! {
    #[test]
    fn events_match_ok_to_alerting_edges(
        readings in prop::collection::vec(0.0f64..100.0, 0..60),
        threshold in 50.0f64..95.0,
        margin in 0.0f64..20.0,
    ) {
        let machine = AlertStateMachine::new(MetricSettings::new("m", threshold, margin));
        let mut state = MonitorState::initial("m");
        let mut edges = 0;
        let mut events = 0;
        for (i, value) in readings.iter().enumerate() {
            let before = state.status;
            let transition = machine.observe(&state, *value, at(i as i64));
            if before == AlertStatus::Ok && transition.state.status == AlertStatus::Alerting {
                edges += 1;
            }
            if transition.event.is_some() {
                events += 1;
                prop_assert!(*value > threshold);
                prop_assert_eq!(before, AlertStatus::Ok);
            }
            if before == AlertStatus::Alerting && transition.state.status == AlertStatus::Ok {
                prop_assert!(*value <= threshold - margin);
            }
            state = transition.state;
        }
        prop_assert_eq!(edges, events);
    }
}
