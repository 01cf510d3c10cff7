//! ReportFormatter: renders a run, its tier, and optional comparison,
//! budget and trend as a text block or JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use perfwatch_core::types::{
    AggregateResult, Classification, ComparisonResult, Trend, Verdict,
};

use crate::budget::BudgetVerdict;

/// Call count used for the projected savings line.
pub const TYPICAL_CALLS: u64 = 50;

const RULE_TOP: &str = "╔══════════════════════════════════════════════════════════════╗\n";
const RULE_MID: &str = "╠══════════════════════════════════════════════════════════════╣\n";
const RULE_BOTTOM: &str = "╚══════════════════════════════════════════════════════════════╝\n";

/// A rendered-on-demand benchmark report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchReport {
    pub operation: String,
    pub timestamp: DateTime<Utc>,
    pub aggregate: AggregateResult,
    pub classification: Classification,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comparison: Option<ComparisonResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<BudgetVerdict>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trend: Option<Trend>,
}

impl BenchReport {
    pub fn new(
        aggregate: AggregateResult,
        classification: Classification,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            operation: aggregate.operation().to_string(),
            timestamp,
            aggregate,
            classification,
            comparison: None,
            budget: None,
            trend: None,
        }
    }

    pub fn with_comparison(mut self, comparison: ComparisonResult) -> Self {
        self.comparison = Some(comparison);
        self
    }

    pub fn with_budget(mut self, budget: Option<BudgetVerdict>) -> Self {
        self.budget = budget;
        self
    }

    pub fn with_trend(mut self, trend: Option<Trend>) -> Self {
        self.trend = trend;
        self
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Human-readable summary. Same report in, same text out.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        out.push_str(RULE_TOP);
        out.push_str(&format!(
            "║  PERFWATCH BENCHMARK: {} ({})\n",
            self.operation,
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
        ));
        out.push_str(RULE_MID);
        render_aggregate(&mut out, &self.aggregate);
        out.push_str(&format!("║  Tier: {}\n", self.classification));

        if let Some(ref comparison) = self.comparison {
            out.push_str(RULE_MID);
            render_comparison(&mut out, comparison);
        }

        if let Some(ref budget) = self.budget {
            out.push_str(RULE_MID);
            let status = if budget.passed { "✓ PASS" } else { "⚠ FAIL" };
            out.push_str(&format!(
                "║  Budget: {} (mean <= {:.3}ms)\n",
                status, budget.max_mean_ms
            ));
            for violation in &budget.violations {
                out.push_str(&format!("║    {violation}\n"));
            }
        }

        if let Some(ref trend) = self.trend {
            out.push_str(RULE_MID);
            out.push_str(&format!(
                "║  Trend over {} runs: {} ({:+.1}%, {:.3}ms -> {:.3}ms)\n",
                trend.runs,
                trend.direction.as_str(),
                trend.change_ratio * 100.0,
                trend.oldest_mean,
                trend.newest_mean,
            ));
        }

        out.push_str(RULE_BOTTOM);
        out
    }
}

fn render_aggregate(out: &mut String, aggregate: &AggregateResult) {
    out.push_str(&format!(
        "║  Samples: {} ok, {} failed (failure rate {:.1}%)\n",
        aggregate.count(),
        aggregate.failures(),
        aggregate.failure_rate() * 100.0,
    ));
    match aggregate {
        AggregateResult::Computed(s) => {
            out.push_str(&format!(
                "║  {:>10} {:>10} {:>10} {:>10} {:>10}\n",
                "MEAN(ms)", "MEDIAN", "MIN", "MAX", "STDDEV"
            ));
            out.push_str(&format!(
                "║  {:>10.3} {:>10.3} {:>10.3} {:>10.3} {:>10.3}\n",
                s.mean, s.median, s.min, s.max, s.stddev
            ));
        }
        AggregateResult::InsufficientData(d) => {
            out.push_str(&format!("║  Insufficient data: {}\n", d.reason));
        }
    }
}

fn render_comparison(out: &mut String, comparison: &ComparisonResult) {
    let marker = match comparison.verdict {
        Verdict::Improved => "✓",
        Verdict::Regressed => "⚠",
        Verdict::Unchanged | Verdict::InsufficientData => "·",
    };
    match comparison.improvement_ratio {
        Some(ratio) => out.push_str(&format!(
            "║  {} {} {:+.1}% (tolerance: {:.1}%)\n",
            marker,
            comparison.verdict.as_str(),
            ratio * 100.0,
            comparison.tolerance * 100.0,
        )),
        None => out.push_str(&format!("║  {} {}\n", marker, comparison.verdict.as_str())),
    }
    if let (Some(base), Some(cand)) = (comparison.baseline.mean(), comparison.candidate.mean()) {
        out.push_str(&format!("║  Baseline: {base:.3}ms  Candidate: {cand:.3}ms\n"));
    }
    if let Some(impact) = comparison.impact {
        out.push_str(&format!("║  Impact: {}\n", impact.as_str()));
    }
    if let (Some(delta), Some(savings)) = (
        comparison.mean_delta_ms,
        comparison.projected_savings_ms(TYPICAL_CALLS),
    ) {
        out.push_str(&format!(
            "║  Delta: {delta:.3}ms per call, {savings:.3}ms per {TYPICAL_CALLS} calls\n"
        ));
    }
    if let Some(p) = comparison.p_value {
        out.push_str(&format!("║  Welch p-value: {p:.4}\n"));
    }
}
