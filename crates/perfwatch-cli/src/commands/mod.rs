//! Subcommand implementations.

mod bench;
mod compare;
mod config;
mod history;
mod tick;

use std::path::Path;

use perfwatch_core::config::{CliOverrides, PerfwatchConfig};

use crate::cli::{Cli, Command};
use crate::error::CliError;

/// How a command that ran to completion ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    /// A check failed: insufficient data, regression, budget, new alert.
    CheckFailed,
}

impl Status {
    fn failed_if(condition: bool) -> Self {
        if condition {
            Self::CheckFailed
        } else {
            Self::Success
        }
    }
}

/// Process exit code: 0 success, 1 failed check, 2 configuration or
/// storage error.
pub fn exit_code(result: &Result<Status, CliError>) -> u8 {
    match result {
        Ok(Status::Success) => 0,
        Ok(Status::CheckFailed) => 1,
        Err(_) => 2,
    }
}

pub fn run(cli: &Cli) -> Result<Status, CliError> {
    let config_path = cli.config.as_deref();
    match &cli.command {
        Command::Bench(args) => {
            bench::run(args, load(config_path, &args.sampling.overrides())?, cli.json)
        }
        Command::Compare(args) => {
            compare::run(args, load(config_path, &args.sampling.overrides())?, cli.json)
        }
        Command::History(args) => {
            let overrides = CliOverrides {
                history_path: args.history.clone(),
                ..Default::default()
            };
            history::run(args, load(config_path, &overrides)?, cli.json)
        }
        Command::Tick(args) => {
            tick::run(args, load(config_path, &CliOverrides::default())?, cli.json)
        }
        Command::Config(args) => config::run(load(config_path, &args.overrides())?),
    }
}

fn load(path: Option<&Path>, overrides: &CliOverrides) -> Result<PerfwatchConfig, CliError> {
    Ok(PerfwatchConfig::load(path, Some(overrides))?)
}

/// Print `value` as pretty JSON on stdout.
fn print_json<T: serde::Serialize>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;
    use std::time::Duration;

    use clap::Parser;
    use perfwatch_core::errors::{PerfwatchErrorCode, StorageError};
    use perfwatch_storage::MonitorStateStore;
    use tempfile::TempDir;

    use super::*;

    struct Workspace {
        dir: TempDir,
        config: PathBuf,
    }

    impl Workspace {
        fn new() -> Self {
            let dir = TempDir::new().unwrap();
            let root = dir.path().display();
            let config = dir.path().join("perfwatch.toml");
            fs::write(
                &config,
                format!(
                    r#"
[bench]
iterations = 3
warmup = 0

[bench.operations.slow]
max_mean_ms = 0.000001

[storage]
history_path = "{root}/history.jsonl"

[monitor]
threshold = 90.0
hysteresis_margin = 5.0
lock_timeout_ms = 50
state_dir = "{root}/state"
alert_log = "{root}/alerts.jsonl"
"#
                ),
            )
            .unwrap();
            Self { dir, config }
        }

        fn cli(&self, args: &[&str]) -> Cli {
            let mut argv = vec!["perfwatch", "--config", self.config.to_str().unwrap()];
            argv.extend_from_slice(args);
            Cli::try_parse_from(argv).unwrap()
        }

        fn exit(&self, args: &[&str]) -> u8 {
            exit_code(&run(&self.cli(args)))
        }
    }

    #[test]
    #[cfg(unix)]
    fn bench_of_a_passing_command_exits_zero_and_records() {
        let ws = Workspace::new();
        assert_eq!(ws.exit(&["bench", "--operation", "noop", "--", "true"]), 0);

        let history = fs::read_to_string(ws.dir.path().join("history.jsonl")).unwrap();
        assert_eq!(history.lines().count(), 1);
    }

    #[test]
    #[cfg(unix)]
    fn bench_over_the_failure_ceiling_exits_one() {
        let ws = Workspace::new();
        let code = ws.exit(&["bench", "--operation", "broken", "--", "sh", "-c", "exit 1"]);
        assert_eq!(code, 1);
    }

    #[test]
    #[cfg(unix)]
    fn budget_only_fails_when_enforced() {
        let ws = Workspace::new();
        assert_eq!(
            ws.exit(&["bench", "--operation", "slow", "--no-record", "--", "true"]),
            0
        );
        assert_eq!(
            ws.exit(&[
                "bench",
                "--operation",
                "slow",
                "--no-record",
                "--enforce-budget",
                "--",
                "true"
            ]),
            1
        );
    }

    #[test]
    #[cfg(unix)]
    fn tick_exits_one_only_on_the_raising_tick() {
        let ws = Workspace::new();
        let high = ["tick", "--metric", "queue", "--command", "echo 95"];

        assert_eq!(ws.exit(&high), 1);
        // still alerting, no new alert
        assert_eq!(ws.exit(&high), 0);
        assert_eq!(
            ws.exit(&["tick", "--metric", "queue", "--command", "echo 10"]),
            0
        );
        assert_eq!(ws.exit(&high), 1);

        let alerts = fs::read_to_string(ws.dir.path().join("alerts.jsonl")).unwrap();
        assert_eq!(alerts.lines().count(), 2);
    }

    #[test]
    #[cfg(unix)]
    fn skipped_tick_exits_zero() {
        let ws = Workspace::new();
        let holder = MonitorStateStore::new(ws.dir.path().join("state"));

        let code = holder
            .with_exclusive::<_, StorageError, _>("queue", Duration::from_secs(1), |_| {
                Ok(ws.exit(&["tick", "--metric", "queue", "--command", "echo 95"]))
            })
            .unwrap()
            .unwrap();

        assert_eq!(code, 0);
        assert_eq!(holder.missed_ticks("queue").unwrap().len(), 1);
    }

    #[test]
    fn missing_config_file_exits_two() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.toml");
        let cli = Cli::try_parse_from([
            "perfwatch",
            "--config",
            missing.to_str().unwrap(),
            "tick",
            "--metric",
            "memory",
        ])
        .unwrap();

        let result = run(&cli);
        assert_eq!(exit_code(&result), 2);
        assert_eq!(result.unwrap_err().error_code(), "CONFIG_ERROR");
    }

    #[test]
    fn invalid_config_exits_two() {
        let ws = Workspace::new();
        fs::write(&ws.config, "[monitor]\nhysteresis_margin = -1.0\n").unwrap();
        assert_eq!(ws.exit(&["config"]), 2);
    }

    #[test]
    fn unknown_metric_exits_two() {
        let ws = Workspace::new();
        assert_eq!(ws.exit(&["tick", "--metric", "network"]), 2);
    }
}
