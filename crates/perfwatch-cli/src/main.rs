//! perfwatch: benchmark harness and resource monitor.
//!
//! # Commands
//!
//! - `bench` - sample a command, classify it, record it in the history
//! - `compare` - benchmark a baseline and a candidate command back to back
//! - `history` - recent runs of an operation and their trend
//! - `tick` - one monitor tick for a metric
//! - `config` - print the effective configuration
//!
//! Exit codes: 0 success, 1 a failed check (insufficient data, regression,
//! violated budget, newly raised alert), 2 configuration or storage error.

mod cli;
mod commands;
mod error;

use std::process::ExitCode;

use clap::Parser;
use perfwatch_core::errors::PerfwatchErrorCode;

use crate::cli::Cli;

fn main() -> ExitCode {
    perfwatch_core::tracing::init_tracing();
    let cli = Cli::parse();

    let result = commands::run(&cli);
    if let Err(ref e) = result {
        tracing::error!(code = e.error_code(), "{e}");
        eprintln!("{}", e.coded_string());
    }
    ExitCode::from(commands::exit_code(&result))
}
