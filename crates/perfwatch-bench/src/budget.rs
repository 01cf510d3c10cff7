//! Per-operation performance budgets.

use serde::{Deserialize, Serialize};

use perfwatch_core::types::AggregateResult;

/// Result of checking one run against its mean-time budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetVerdict {
    pub operation: String,
    pub max_mean_ms: f64,
    pub passed: bool,
    pub violations: Vec<String>,
}

/// Check `aggregate` against `max_mean_ms`. Insufficient data fails.
pub fn check_budget(aggregate: &AggregateResult, max_mean_ms: f64) -> BudgetVerdict {
    let mut violations = Vec::new();
    match aggregate {
        AggregateResult::Computed(stats) => {
            if stats.mean > max_mean_ms {
                violations.push(format!(
                    "mean_ms: {:.3} > {:.3} budget",
                    stats.mean, max_mean_ms
                ));
            }
        }
        AggregateResult::InsufficientData(data) => {
            violations.push(format!("insufficient data: {}", data.reason));
        }
    }

    BudgetVerdict {
        operation: aggregate.operation().to_string(),
        max_mean_ms,
        passed: violations.is_empty(),
        violations,
    }
}
