//! `perfwatch config`

use perfwatch_core::config::PerfwatchConfig;

use super::Status;
use crate::error::CliError;

pub fn run(config: PerfwatchConfig) -> Result<Status, CliError> {
    print!("{}", config.to_toml()?);
    Ok(Status::Success)
}
