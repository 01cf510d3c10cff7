//! Benchmark probe that runs an external command.

use std::process::{Command, Stdio};

use perfwatch_core::errors::ProbeError;
use perfwatch_core::traits::Probe;

/// Times one execution of a command per call. A non-zero exit status is a
/// failed call. Output is discarded.
#[derive(Debug, Clone)]
pub struct CommandProbe {
    program: String,
    args: Vec<String>,
}

impl CommandProbe {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Build from an argv list; `None` when it is empty.
    pub fn from_argv(argv: &[String]) -> Option<Self> {
        let (program, args) = argv.split_first()?;
        Some(Self::new(program.clone(), args.to_vec()))
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Probe for CommandProbe {
    fn call(&self) -> Result<(), ProbeError> {
        let status = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| ProbeError::failed(format!("could not run {}: {e}", self.program)))?;
        if status.success() {
            Ok(())
        } else {
            Err(ProbeError::failed(format!(
                "{} exited with {status}",
                self.program
            )))
        }
    }
}
