//! Trend and sustained-regression reads.

use chrono::{TimeZone, Utc};
use perfwatch_core::types::{
    AggregateResult, AggregateStats, HistoryRecord, InsufficientData, InsufficientReason,
    TrendDirection,
};
use perfwatch_storage::{detect_sustained_regression, trend};

fn run(mean: f64) -> HistoryRecord {
    HistoryRecord::new(
        AggregateResult::Computed(AggregateStats {
            operation: "auth".to_string(),
            count: 10,
            failures: 0,
            mean,
            median: mean,
            min: mean,
            max: mean,
            stddev: 0.0,
            failure_rate: 0.0,
        }),
        Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap(),
    )
}

fn failed_run() -> HistoryRecord {
    HistoryRecord::new(
        AggregateResult::InsufficientData(InsufficientData {
            operation: "auth".to_string(),
            count: 0,
            failures: 10,
            failure_rate: 1.0,
            reason: InsufficientReason::NoSuccessfulSamples,
        }),
        Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap(),
    )
}

#[test]
fn direction_follows_oldest_versus_newest() {
    let faster = trend(&[run(0.463), run(0.4), run(0.237)], 0.02).unwrap();
    assert_eq!(faster.direction, TrendDirection::Faster);
    assert_eq!(faster.runs, 3);
    assert_eq!(faster.oldest_mean, 0.463);
    assert_eq!(faster.newest_mean, 0.237);
    assert!(faster.change_ratio < 0.0);

    let slower = trend(&[run(1.0), run(1.5)], 0.02).unwrap();
    assert_eq!(slower.direction, TrendDirection::Slower);
    assert!((slower.change_ratio - 0.5).abs() < 1e-12);

    let stable = trend(&[run(1.0), run(1.01)], 0.02).unwrap();
    assert_eq!(stable.direction, TrendDirection::Stable);
}

#[test]
fn insufficient_runs_are_skipped() {
    let t = trend(&[failed_run(), run(2.0), failed_run(), run(1.0)], 0.02).unwrap();
    assert_eq!(t.runs, 2);
    assert_eq!(t.oldest_mean, 2.0);
    assert_eq!(t.direction, TrendDirection::Faster);
}

#[test]
fn too_little_history_has_no_trend() {
    assert!(trend(&[], 0.02).is_none());
    assert!(trend(&[run(1.0)], 0.02).is_none());
    assert!(trend(&[run(1.0), failed_run()], 0.02).is_none());
    assert!(trend(&[run(0.0), run(1.0)], 0.02).is_none());
}

#[test]
fn sustained_regression_needs_two_full_windows() {
    let history: Vec<HistoryRecord> = [1.0, 1.0, 1.0, 1.2, 1.2, 1.2].map(run).to_vec();
    let change = detect_sustained_regression(&history, 3, 0.05).unwrap();
    assert!((change - 0.2).abs() < 1e-9, "change = {change}");

    assert!(detect_sustained_regression(&history, 4, 0.05).is_none());
    assert!(detect_sustained_regression(&history, 3, 0.25).is_none());
    assert!(detect_sustained_regression(&history, 0, 0.05).is_none());

    let improving: Vec<HistoryRecord> = [1.2, 1.2, 1.0, 1.0].map(run).to_vec();
    assert!(detect_sustained_regression(&improving, 2, 0.05).is_none());
}
