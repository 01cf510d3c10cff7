//! `perfwatch compare`

use std::sync::Arc;

use chrono::Utc;

use perfwatch_bench::{compare, run_benchmark, BenchReport, CommandProbe, Sampler};
use perfwatch_core::config::PerfwatchConfig;
use perfwatch_core::types::Verdict;

use super::Status;
use crate::cli::{split_command, CompareArgs};
use crate::error::CliError;

pub fn run(args: &CompareArgs, config: PerfwatchConfig, json: bool) -> Result<Status, CliError> {
    let settings = config.bench_settings()?;
    let baseline = probe_for("baseline", &args.baseline)?;
    let candidate = probe_for("candidate", &args.candidate)?;

    // One sampler for both sides so they share clock and timeout.
    let sampler = Sampler::new(settings.call_timeout);
    let baseline = run_benchmark(&sampler, &args.operation, baseline, &settings);
    let candidate = run_benchmark(&sampler, &args.operation, candidate, &settings);

    let comparison = compare(
        &baseline.aggregate,
        &candidate.aggregate,
        settings.tolerance_for(&args.operation),
    );
    let verdict = comparison.verdict;
    let report = BenchReport::new(candidate.aggregate, candidate.classification, Utc::now())
        .with_comparison(comparison);

    if json {
        println!("{}", report.to_json()?);
    } else {
        print!("{}", report.summary());
    }

    Ok(Status::failed_if(matches!(
        verdict,
        Verdict::Regressed | Verdict::InsufficientData
    )))
}

fn probe_for(side: &str, line: &str) -> Result<Arc<CommandProbe>, CliError> {
    CommandProbe::from_argv(&split_command(line))
        .map(Arc::new)
        .ok_or_else(|| CliError::Usage(format!("empty {side} command")))
}
