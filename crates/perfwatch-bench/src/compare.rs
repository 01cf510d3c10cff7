//! OptimizationComparator: certifies whether a candidate beats a baseline.

use statrs::distribution::{ContinuousCDF, StudentsT};

use perfwatch_core::types::{AggregateResult, AggregateStats, ComparisonResult, Impact, Verdict};

/// Candidate/baseline mean ratio below which an improvement is major.
const MAJOR_IMPACT_RATIO: f64 = 0.5;
/// Candidate/baseline mean ratio below which an improvement is moderate.
const MODERATE_IMPACT_RATIO: f64 = 0.8;

/// Compare a candidate run against a baseline run.
///
/// `improvement_ratio = (baseline.mean - candidate.mean) / baseline.mean`.
/// The verdict is `improved` above `tolerance`, `regressed` below
/// `-tolerance`, `unchanged` in between. Either side insufficient, or a
/// zero baseline mean, gives `insufficient_data` with no ratio.
///
/// The operation label is taken from the baseline; the two sides may
/// measure differently named implementations of the same work.
pub fn compare(
    baseline: &AggregateResult,
    candidate: &AggregateResult,
    tolerance: f64,
) -> ComparisonResult {
    let mut result = ComparisonResult {
        operation: baseline.operation().to_string(),
        baseline: baseline.clone(),
        candidate: candidate.clone(),
        improvement_ratio: None,
        verdict: Verdict::InsufficientData,
        tolerance,
        impact: None,
        mean_delta_ms: None,
        p_value: None,
    };

    let (base, cand) = match (baseline.stats(), candidate.stats()) {
        (Some(base), Some(cand)) if base.mean > 0.0 => (base, cand),
        _ => return result,
    };

    let ratio = (base.mean - cand.mean) / base.mean;
    result.verdict = if ratio > tolerance {
        Verdict::Improved
    } else if ratio < -tolerance {
        Verdict::Regressed
    } else {
        Verdict::Unchanged
    };
    if result.verdict == Verdict::Improved {
        let speed_ratio = cand.mean / base.mean;
        result.impact = Some(if speed_ratio < MAJOR_IMPACT_RATIO {
            Impact::Major
        } else if speed_ratio < MODERATE_IMPACT_RATIO {
            Impact::Moderate
        } else {
            Impact::Minimal
        });
    }
    result.improvement_ratio = Some(ratio);
    result.mean_delta_ms = Some(base.mean - cand.mean);
    result.p_value = welch_p_value(base, cand);
    result
}

/// Two-sided p-value of Welch's unequal-variance t-test on the means.
/// `None` below two samples per side or when both variances are zero.
fn welch_p_value(a: &AggregateStats, b: &AggregateStats) -> Option<f64> {
    if a.count < 2 || b.count < 2 {
        return None;
    }
    let (n1, n2) = (a.count as f64, b.count as f64);
    let se1 = a.stddev.powi(2) / n1;
    let se2 = b.stddev.powi(2) / n2;
    let se = se1 + se2;
    if !se.is_finite() || se <= 0.0 {
        return None;
    }

    let t = (a.mean - b.mean) / se.sqrt();
    let df = se.powi(2) / (se1.powi(2) / (n1 - 1.0) + se2.powi(2) / (n2 - 1.0));
    if !df.is_finite() || df <= 0.0 {
        return None;
    }

    let dist = StudentsT::new(0.0, 1.0, df).ok()?;
    let p = 2.0 * (1.0 - dist.cdf(t.abs()));
    p.is_finite().then(|| p.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(mean: f64, stddev: f64, count: usize) -> AggregateStats {
        AggregateStats {
            operation: "op".to_string(),
            count,
            failures: 0,
            mean,
            median: mean,
            min: mean,
            max: mean,
            stddev,
            failure_rate: 0.0,
        }
    }

    #[test]
    fn welch_needs_two_samples_and_variance() {
        assert_eq!(welch_p_value(&stats(1.0, 0.1, 1), &stats(2.0, 0.1, 10)), None);
        assert_eq!(welch_p_value(&stats(1.0, 0.0, 10), &stats(2.0, 0.0, 10)), None);
    }

    #[test]
    fn welch_identical_means_is_not_significant() {
        let p = welch_p_value(&stats(1.0, 0.2, 30), &stats(1.0, 0.2, 30)).unwrap();
        assert!((p - 1.0).abs() < 1e-9, "p = {p}");
    }

    #[test]
    fn welch_separated_means_is_significant() {
        let p = welch_p_value(&stats(0.463, 0.02, 100), &stats(0.237, 0.02, 100)).unwrap();
        assert!(p < 1e-6, "p = {p}");
    }
}
