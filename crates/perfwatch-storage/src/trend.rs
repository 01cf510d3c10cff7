//! Trend reads over a window of history records.

use perfwatch_core::types::{HistoryRecord, Trend, TrendDirection};

/// Compare the oldest and newest computed means in `records` (oldest
/// first). Records without a computed mean are ignored. `None` when fewer
/// than two computed records remain or the oldest mean is zero.
pub fn trend(records: &[HistoryRecord], tolerance: f64) -> Option<Trend> {
    let means: Vec<f64> = records.iter().filter_map(|r| r.aggregate.mean()).collect();
    let (&oldest, &newest) = (means.first()?, means.last()?);
    if means.len() < 2 || oldest <= 0.0 {
        return None;
    }

    let change_ratio = (newest - oldest) / oldest;
    let direction = if change_ratio < -tolerance {
        TrendDirection::Faster
    } else if change_ratio > tolerance {
        TrendDirection::Slower
    } else {
        TrendDirection::Stable
    };

    Some(Trend {
        operation: records.first().map(|r| r.operation.clone()).unwrap_or_default(),
        runs: means.len(),
        oldest_mean: oldest,
        newest_mean: newest,
        change_ratio,
        direction,
    })
}

/// Detect a sustained regression: the average mean of the last `window`
/// computed records is more than `threshold` (a fraction) above the
/// average of the `window` before them. Returns the change ratio.
pub fn detect_sustained_regression(
    records: &[HistoryRecord],
    window: usize,
    threshold: f64,
) -> Option<f64> {
    let means: Vec<f64> = records.iter().filter_map(|r| r.aggregate.mean()).collect();
    if window == 0 || means.len() < window * 2 {
        return None;
    }
    let recent = &means[means.len() - window..];
    let previous = &means[means.len() - 2 * window..means.len() - window];

    let recent_avg = recent.iter().sum::<f64>() / window as f64;
    let prev_avg = previous.iter().sum::<f64>() / window as f64;
    if prev_avg <= 0.0 {
        return None;
    }
    let change = recent_avg / prev_avg - 1.0;
    (change > threshold).then_some(change)
}
