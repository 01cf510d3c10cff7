//! `perfwatch history`

use serde_json::json;

use perfwatch_core::config::PerfwatchConfig;
use perfwatch_storage::{detect_sustained_regression, open_store, trend};

use super::{print_json, Status};
use crate::cli::HistoryArgs;
use crate::error::CliError;

/// Runs averaged on each side of the sustained-regression check.
const REGRESSION_WINDOW: usize = 3;

pub fn run(args: &HistoryArgs, config: PerfwatchConfig, json: bool) -> Result<Status, CliError> {
    let settings = config.bench_settings()?;
    let tolerance = settings.tolerance_for(&args.operation);
    let store = open_store(&config.storage)?;
    let records = store.query(&args.operation, args.limit)?;
    let trend = trend(&records, tolerance);
    let regression = detect_sustained_regression(&records, REGRESSION_WINDOW, tolerance);

    if json {
        print_json(&json!({
            "operation": args.operation,
            "records": records,
            "trend": trend,
            "sustained_regression": regression,
        }))?;
        return Ok(Status::Success);
    }

    if records.is_empty() {
        println!("No recorded runs for {}", args.operation);
        return Ok(Status::Success);
    }

    println!(
        "{:<25} {:>10} {:>10} {:>8} {:>9}",
        "TIMESTAMP", "MEAN(ms)", "MEDIAN", "N", "FAIL%"
    );
    for record in &records {
        let ts = record.timestamp.format("%Y-%m-%d %H:%M:%S");
        match record.aggregate.stats() {
            Some(s) => println!(
                "{:<25} {:>10.3} {:>10.3} {:>8} {:>8.1}%",
                ts,
                s.mean,
                s.median,
                s.count,
                s.failure_rate * 100.0
            ),
            None => println!(
                "{:<25} {:>10} {:>10} {:>8} {:>8.1}%",
                ts,
                "-",
                "-",
                record.aggregate.count(),
                record.aggregate.failure_rate() * 100.0
            ),
        }
    }

    if let Some(trend) = trend {
        println!(
            "Trend over {} runs: {} ({:+.1}%)",
            trend.runs,
            trend.direction.as_str(),
            trend.change_ratio * 100.0
        );
    }
    if let Some(change) = regression {
        println!(
            "⚠ Sustained regression: last {REGRESSION_WINDOW} runs {:+.1}% slower than the {REGRESSION_WINDOW} before",
            change * 100.0
        );
    }
    Ok(Status::Success)
}
