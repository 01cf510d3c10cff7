//! One benchmark run end to end: sample, aggregate, apply the failure
//! ceiling, classify.

use std::sync::Arc;

use tracing::info;

use perfwatch_core::config::BenchSettings;
use perfwatch_core::traits::Probe;
use perfwatch_core::types::{AggregateResult, Classification, Sample};

use crate::budget::{check_budget, BudgetVerdict};
use crate::sampler::Sampler;
use crate::stats::{aggregate, apply_failure_ceiling};
use crate::tiers::classify;

/// Everything one run produced.
#[derive(Debug, Clone)]
pub struct BenchRun {
    pub samples: Vec<Sample>,
    pub aggregate: AggregateResult,
    pub classification: Classification,
}

impl BenchRun {
    /// Budget verdict for this run, if the operation has a budget.
    pub fn budget(&self, settings: &BenchSettings) -> Option<BudgetVerdict> {
        settings
            .budget_for(self.aggregate.operation())
            .map(|max| check_budget(&self.aggregate, max))
    }

    /// True when no trustworthy statistic came out of the run.
    pub fn is_insufficient(&self) -> bool {
        self.aggregate.is_insufficient()
    }
}

/// Sample `probe` under `settings` and reduce the samples.
pub fn run_benchmark(
    sampler: &Sampler,
    operation: &str,
    probe: Arc<dyn Probe>,
    settings: &BenchSettings,
) -> BenchRun {
    let samples = sampler.sample(operation, probe, settings.iterations, settings.warmup);
    let aggregate = apply_failure_ceiling(aggregate(operation, &samples), settings.failure_ceiling);
    let classification = classify(&aggregate, &settings.tiers);

    match aggregate.mean() {
        Some(mean) => info!(
            operation,
            elapsed_ms = mean,
            failure_rate = aggregate.failure_rate(),
            tier = %classification,
            "benchmark complete"
        ),
        None => info!(
            operation,
            failure_rate = aggregate.failure_rate(),
            "benchmark produced insufficient data"
        ),
    }

    BenchRun {
        samples,
        aggregate,
        classification,
    }
}
