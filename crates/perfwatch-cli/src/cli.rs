//! Command-line surface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use perfwatch_core::config::CliOverrides;

/// perfwatch - benchmark harness and debounced resource monitor
#[derive(Parser, Debug)]
#[command(name = "perfwatch")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Config file (default: ./perfwatch.toml when present)
    #[arg(short, long, global = true, env = "PERFWATCH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Print machine-readable JSON instead of the text report
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Benchmark a command and record the result
    ///
    /// Examples:
    ///   perfwatch bench --operation db-create -- ./target/release/mkdb
    ///   perfwatch bench --operation ls --iterations 50 --compare-last -- ls -la
    Bench(BenchArgs),
    /// Benchmark a baseline and a candidate command and compare them
    ///
    /// Commands are split on whitespace; no shell quoting is applied.
    Compare(CompareArgs),
    /// Show recorded runs of an operation and their trend
    History(HistoryArgs),
    /// Run one monitor tick for a metric
    ///
    /// Examples:
    ///   perfwatch tick --metric memory
    ///   perfwatch tick --metric queue --command "./queue-depth.sh"
    Tick(TickArgs),
    /// Print the effective configuration as TOML
    Config(SamplingArgs),
}

/// Sampling overrides shared by the benchmarking commands.
#[derive(Args, Debug, Clone, Default)]
pub struct SamplingArgs {
    /// Measured calls per run
    #[arg(short = 'n', long)]
    pub iterations: Option<u32>,

    /// Unrecorded calls before measurement
    #[arg(short, long)]
    pub warmup: Option<u32>,

    /// Relative change treated as noise, e.g. 0.02
    #[arg(short, long)]
    pub tolerance: Option<f64>,

    /// History file or database
    #[arg(long)]
    pub history: Option<PathBuf>,
}

impl SamplingArgs {
    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            iterations: self.iterations,
            warmup: self.warmup,
            tolerance: self.tolerance,
            history_path: self.history.clone(),
        }
    }
}

#[derive(Args, Debug)]
pub struct BenchArgs {
    /// Operation label used for history and budgets
    #[arg(short, long)]
    pub operation: String,

    #[command(flatten)]
    pub sampling: SamplingArgs,

    /// Do not append this run to the history
    #[arg(long)]
    pub no_record: bool,

    /// Compare against the most recent recorded run of the operation
    #[arg(long)]
    pub compare_last: bool,

    /// Exit 1 when the operation's budget is violated
    #[arg(long)]
    pub enforce_budget: bool,

    /// Command to benchmark
    #[arg(last = true, required = true, value_name = "CMD")]
    pub command: Vec<String>,
}

#[derive(Args, Debug)]
pub struct CompareArgs {
    #[arg(short, long)]
    pub operation: String,

    #[command(flatten)]
    pub sampling: SamplingArgs,

    /// Baseline command line
    #[arg(long, value_name = "CMD")]
    pub baseline: String,

    /// Candidate command line
    #[arg(long, value_name = "CMD")]
    pub candidate: String,
}

#[derive(Args, Debug)]
pub struct HistoryArgs {
    #[arg(short, long)]
    pub operation: String,

    /// Number of most recent runs to show
    #[arg(short, long, default_value = "20")]
    pub limit: usize,

    /// History file or database
    #[arg(long)]
    pub history: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct TickArgs {
    /// Metric to read: memory, load, or any name with --command
    #[arg(short, long)]
    pub metric: String,

    /// Command whose stdout is the metric value
    #[arg(long, value_name = "CMD")]
    pub command: Option<String>,
}

/// Split a command line on whitespace.
pub fn split_command(line: &str) -> Vec<String> {
    line.split_whitespace().map(str::to_string).collect()
}
