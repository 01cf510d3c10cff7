//! Metric read from an external command's standard output.

use std::process::{Command, Stdio};

use perfwatch_core::errors::ProbeError;
use perfwatch_core::traits::MetricProbe;

/// Runs a command once per read; trimmed stdout must parse as a number.
#[derive(Debug, Clone)]
pub struct CommandMetricProbe {
    metric: String,
    program: String,
    args: Vec<String>,
}

impl CommandMetricProbe {
    pub fn new(metric: impl Into<String>, program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            metric: metric.into(),
            program: program.into(),
            args,
        }
    }

    /// Build from an argv list; `None` when it is empty.
    pub fn from_argv(metric: impl Into<String>, argv: &[String]) -> Option<Self> {
        let (program, args) = argv.split_first()?;
        Some(Self::new(metric, program.clone(), args.to_vec()))
    }
}

impl MetricProbe for CommandMetricProbe {
    fn metric(&self) -> &str {
        &self.metric
    }

    fn read(&self) -> Result<f64, ProbeError> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()
            .map_err(|e| {
                ProbeError::metric_unavailable(
                    &self.metric,
                    format!("could not run {}: {e}", self.program),
                )
            })?;
        if !output.status.success() {
            return Err(ProbeError::metric_unavailable(
                &self.metric,
                format!("{} exited with {}", self.program, output.status),
            ));
        }
        let stdout = String::from_utf8_lossy(&output.stdout);
        stdout.trim().parse::<f64>().map_err(|_| {
            ProbeError::metric_unavailable(
                &self.metric,
                format!("output {:?} is not a number", stdout.trim()),
            )
        })
    }
}
