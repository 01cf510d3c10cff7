//! Benchmark harness configuration.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;
use crate::types::{Tier, TierSet};

pub const DEFAULT_ITERATIONS: u32 = 100;
pub const DEFAULT_WARMUP: u32 = 1;
pub const DEFAULT_TOLERANCE: f64 = 0.02;
pub const DEFAULT_FAILURE_CEILING: f64 = 0.1;
pub const DEFAULT_CALL_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_WORST_TIER: &str = "needs_optimization";

/// Default timing tiers in milliseconds.
pub fn default_tiers() -> Vec<Tier> {
    vec![
        Tier::new("excellent", 1.0),
        Tier::new("good", 5.0),
        Tier::new("acceptable", 10.0),
    ]
}

/// Configuration for the benchmark harness.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct BenchConfig {
    /// Measured calls per run. Default: 100.
    pub iterations: Option<u32>,
    /// Discarded calls before measuring. Default: 1.
    pub warmup: Option<u32>,
    /// Comparator noise tolerance as a fraction. Default: 0.02.
    pub tolerance: Option<f64>,
    /// Failure rate above which a run is insufficient data. Default: 0.1.
    pub failure_ceiling: Option<f64>,
    /// Per-call timeout in milliseconds; 0 disables. Default: 30000.
    pub call_timeout_ms: Option<u64>,
    /// Ordered timing tiers. Default: excellent 1.0 / good 5.0 / acceptable 10.0.
    #[serde(default)]
    pub tiers: Vec<Tier>,
    /// Name of the unbounded tier. Default: "needs_optimization".
    pub worst_tier: Option<String>,
    /// Per-operation overrides keyed by operation name.
    #[serde(default)]
    pub operations: BTreeMap<String, OperationConfig>,
}

/// Per-operation overrides.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct OperationConfig {
    pub tolerance: Option<f64>,
    /// Budget: the run fails its budget when the mean exceeds this.
    pub max_mean_ms: Option<f64>,
}

impl BenchConfig {
    pub fn effective_iterations(&self) -> u32 {
        self.iterations.unwrap_or(DEFAULT_ITERATIONS)
    }

    pub fn effective_warmup(&self) -> u32 {
        self.warmup.unwrap_or(DEFAULT_WARMUP)
    }

    pub fn effective_tolerance(&self) -> f64 {
        self.tolerance.unwrap_or(DEFAULT_TOLERANCE)
    }

    pub fn effective_failure_ceiling(&self) -> f64 {
        self.failure_ceiling.unwrap_or(DEFAULT_FAILURE_CEILING)
    }

    pub fn effective_call_timeout_ms(&self) -> u64 {
        self.call_timeout_ms.unwrap_or(DEFAULT_CALL_TIMEOUT_MS)
    }

    /// Validate and resolve into the form the harness consumes.
    pub fn settings(&self) -> Result<BenchSettings, ConfigError> {
        let iterations = self.effective_iterations();
        if iterations == 0 {
            return Err(ConfigError::ValidationFailed {
                field: "bench.iterations".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        let tolerance = self.effective_tolerance();
        validate_tolerance("bench.tolerance", tolerance)?;
        let failure_ceiling = self.effective_failure_ceiling();
        if !(0.0..=1.0).contains(&failure_ceiling) {
            return Err(ConfigError::ValidationFailed {
                field: "bench.failure_ceiling".to_string(),
                message: "must be between 0.0 and 1.0".to_string(),
            });
        }

        for (name, op) in &self.operations {
            if let Some(t) = op.tolerance {
                validate_tolerance(&format!("bench.operations.{name}.tolerance"), t)?;
            }
            if let Some(budget) = op.max_mean_ms {
                if !budget.is_finite() || budget <= 0.0 {
                    return Err(ConfigError::ValidationFailed {
                        field: format!("bench.operations.{name}.max_mean_ms"),
                        message: "must be a positive number".to_string(),
                    });
                }
            }
        }

        let tiers = if self.tiers.is_empty() {
            default_tiers()
        } else {
            self.tiers.clone()
        };
        let worst = self
            .worst_tier
            .clone()
            .unwrap_or_else(|| DEFAULT_WORST_TIER.to_string());
        let tiers = TierSet::new("bench.tiers", tiers, worst)?;

        let timeout_ms = self.effective_call_timeout_ms();
        Ok(BenchSettings {
            iterations,
            warmup: self.effective_warmup(),
            tolerance,
            failure_ceiling,
            call_timeout: (timeout_ms > 0).then(|| Duration::from_millis(timeout_ms)),
            tiers,
            operations: self.operations.clone(),
        })
    }
}

fn validate_tolerance(field: &str, tolerance: f64) -> Result<(), ConfigError> {
    if !(0.0..1.0).contains(&tolerance) {
        return Err(ConfigError::ValidationFailed {
            field: field.to_string(),
            message: "must be in [0.0, 1.0)".to_string(),
        });
    }
    Ok(())
}

/// Validated benchmark configuration, built once and passed by reference.
#[derive(Debug, Clone)]
pub struct BenchSettings {
    pub iterations: u32,
    pub warmup: u32,
    pub tolerance: f64,
    pub failure_ceiling: f64,
    pub call_timeout: Option<Duration>,
    pub tiers: TierSet,
    operations: BTreeMap<String, OperationConfig>,
}

impl BenchSettings {
    /// Comparator tolerance for `operation`, falling back to the global one.
    pub fn tolerance_for(&self, operation: &str) -> f64 {
        self.operations
            .get(operation)
            .and_then(|o| o.tolerance)
            .unwrap_or(self.tolerance)
    }

    /// Mean-time budget for `operation`, if one is configured.
    pub fn budget_for(&self, operation: &str) -> Option<f64> {
        self.operations.get(operation).and_then(|o| o.max_mean_ms)
    }
}
