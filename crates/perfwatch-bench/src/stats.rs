//! StatisticalAggregator: samples to an [`AggregateResult`].

use perfwatch_core::types::{
    AggregateResult, AggregateStats, InsufficientData, InsufficientReason, Sample,
};

/// Reduce samples to summary statistics over the successful ones.
///
/// Empty or all-failed input yields `InsufficientData`, never a division
/// by zero. Values are sorted with `f64::total_cmp` before every reduction,
/// so any permutation of the same samples gives a bit-identical result.
pub fn aggregate(operation: &str, samples: &[Sample]) -> AggregateResult {
    let attempts = samples.len();
    let mut values: Vec<f64> = samples.iter().filter(|s| s.ok).map(|s| s.value).collect();
    let count = values.len();
    let failures = attempts - count;
    let failure_rate = if attempts == 0 {
        0.0
    } else {
        failures as f64 / attempts as f64
    };

    if count == 0 {
        return AggregateResult::InsufficientData(InsufficientData {
            operation: operation.to_string(),
            count,
            failures,
            failure_rate,
            reason: InsufficientReason::NoSuccessfulSamples,
        });
    }

    values.sort_by(f64::total_cmp);
    let n = count as f64;
    let mean = values.iter().sum::<f64>() / n;
    let mid = count / 2;
    let median = if count % 2 == 1 {
        values[mid]
    } else {
        let (lo, hi) = (values[mid - 1], values[mid]);
        lo + (hi - lo) / 2.0
    };
    let stddev = if count > 1 {
        let sum_sq = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>();
        (sum_sq / (n - 1.0)).sqrt()
    } else {
        0.0
    };

    AggregateResult::Computed(AggregateStats {
        operation: operation.to_string(),
        count,
        failures,
        mean,
        median,
        min: values[0],
        max: values[count - 1],
        stddev,
        failure_rate,
    })
}

/// Mark a computed result insufficient when its failure rate is above
/// `ceiling`. Already-insufficient results pass through unchanged.
pub fn apply_failure_ceiling(result: AggregateResult, ceiling: f64) -> AggregateResult {
    match result {
        AggregateResult::Computed(stats) if stats.failure_rate > ceiling => {
            tracing::warn!(
                operation = %stats.operation,
                failure_rate = stats.failure_rate,
                ceiling,
                "failure rate above ceiling, discarding statistics"
            );
            AggregateResult::InsufficientData(InsufficientData {
                operation: stats.operation,
                count: stats.count,
                failures: stats.failures,
                failure_rate: stats.failure_rate,
                reason: InsufficientReason::FailureRateExceeded { ceiling },
            })
        }
        other => other,
    }
}

