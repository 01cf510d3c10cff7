//! `perfwatch tick`

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;

use perfwatch_core::config::PerfwatchConfig;
use perfwatch_core::errors::MonitorError;
use perfwatch_core::traits::MetricProbe;
use perfwatch_monitor::{builtin_probe, tick, CommandMetricProbe, TickOutcome};
use perfwatch_storage::{JsonlAlertLog, MonitorStateStore};

use super::{print_json, Status};
use crate::cli::{split_command, TickArgs};
use crate::error::CliError;

pub fn run(args: &TickArgs, config: PerfwatchConfig, json: bool) -> Result<Status, CliError> {
    let settings = config.monitor_settings()?;
    let probe = probe_for(args)?;
    let store = MonitorStateStore::new(&settings.state_dir);
    let alerts = JsonlAlertLog::new(&settings.alert_log);

    let outcome = tick(probe, &settings, &store, &alerts, Utc::now())?;

    if json {
        print_json(&json!({
            "metric": args.metric,
            "status": outcome.status_label(),
            "outcome": describe(&outcome),
            "missed_ticks": missed_ticks(&outcome),
        }))?;
    } else {
        println!("{}: {}", args.metric, describe(&outcome));
    }

    Ok(Status::failed_if(outcome.raised_alert()))
}

fn probe_for(args: &TickArgs) -> Result<Arc<dyn MetricProbe>, CliError> {
    if let Some(ref line) = args.command {
        return CommandMetricProbe::from_argv(&args.metric, &split_command(line))
            .map(|p| Arc::new(p) as Arc<dyn MetricProbe>)
            .ok_or_else(|| CliError::Usage("empty metric command".to_string()));
    }
    builtin_probe(&args.metric).ok_or_else(|| {
        MonitorError::UnknownMetric {
            metric: args.metric.clone(),
        }
        .into()
    })
}

fn missed_ticks(outcome: &TickOutcome) -> Option<usize> {
    match outcome {
        TickOutcome::Skipped { missed_ticks } => *missed_ticks,
        _ => None,
    }
}

fn describe(outcome: &TickOutcome) -> String {
    match outcome {
        TickOutcome::Skipped {
            missed_ticks: Some(count),
        } => format!("skipped (state lock busy, {count} missed so far)"),
        TickOutcome::Skipped { missed_ticks: None } => "skipped (state lock busy)".to_string(),
        TickOutcome::ReadFailed { error } => format!("read failed: {error}"),
        TickOutcome::Observed {
            value,
            status,
            health,
            alert,
            suppressed,
        } => {
            let mut line = format!("{value:.1} ({health}), {}", status.as_str());
            if let Some(alert) = alert {
                line.push_str(&format!(
                    ", {} alert raised above {:.1}",
                    alert.severity.as_str(),
                    alert.threshold
                ));
            } else if *suppressed {
                line.push_str(", alert suppressed by cooldown");
            }
            line
        }
    }
}
