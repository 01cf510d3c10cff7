//! `perfwatch bench`

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use perfwatch_bench::{compare, run_benchmark, BenchReport, CommandProbe, Sampler};
use perfwatch_core::config::PerfwatchConfig;
use perfwatch_core::types::HistoryRecord;
use perfwatch_storage::{open_store, trend};

use super::Status;
use crate::cli::BenchArgs;
use crate::error::CliError;

/// Runs read back for the trend line.
const TREND_WINDOW: usize = 10;

pub fn run(args: &BenchArgs, config: PerfwatchConfig, json: bool) -> Result<Status, CliError> {
    let settings = config.bench_settings()?;
    let probe = CommandProbe::from_argv(&args.command)
        .ok_or_else(|| CliError::Usage("no command to benchmark".to_string()))?;
    let tolerance = settings.tolerance_for(&args.operation);

    let sampler = Sampler::new(settings.call_timeout);
    let run = run_benchmark(&sampler, &args.operation, Arc::new(probe), &settings);
    let now = Utc::now();
    let budget = run.budget(&settings);
    let budget_failed = budget.as_ref().is_some_and(|b| !b.passed);

    let mut report = BenchReport::new(run.aggregate.clone(), run.classification.clone(), now)
        .with_budget(budget);

    if args.compare_last || !args.no_record {
        let store = open_store(&config.storage)?;
        let mut history = store.query(&args.operation, TREND_WINDOW)?;

        if args.compare_last {
            match history.last() {
                Some(previous) => {
                    report = report.with_comparison(compare(
                        &previous.aggregate,
                        &run.aggregate,
                        tolerance,
                    ));
                }
                None => info!(operation = %args.operation, "no recorded run to compare against"),
            }
        }

        if !args.no_record {
            let record = HistoryRecord::new(run.aggregate.clone(), now);
            store.append(&record)?;
            history.push(record);
            report = report.with_trend(trend(&history, tolerance));
        }
    }

    if json {
        println!("{}", report.to_json()?);
    } else {
        print!("{}", report.summary());
    }

    Ok(Status::failed_if(
        run.is_insufficient() || (args.enforce_budget && budget_failed),
    ))
}
