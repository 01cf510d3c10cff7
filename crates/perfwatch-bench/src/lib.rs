//! # perfwatch-bench
//!
//! The benchmarking half of perfwatch: a sampler that times repeated calls
//! of an operation, a pure aggregator, tier classification, a
//! baseline-vs-candidate comparator, per-operation budgets and a report
//! formatter.

pub mod budget;
pub mod command;
pub mod compare;
pub mod report;
pub mod runner;
pub mod sampler;
pub mod stats;
pub mod tiers;

pub use budget::{check_budget, BudgetVerdict};
pub use command::CommandProbe;
pub use compare::compare;
pub use report::BenchReport;
pub use runner::{run_benchmark, BenchRun};
pub use sampler::{read_metric, read_metric_within, Sampler, TimerGuard};
pub use stats::{aggregate, apply_failure_ceiling};
pub use tiers::classify;
