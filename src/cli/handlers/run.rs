// src/cli/handlers/run.rs

use crate::{
    cli::args::RunArgs,
    core::{
        config_loader::{self, ConfigError},
        timer::ScopedTimer,
    },
    models::{PerfConfig, TimerSettings},
    system::executor,
};
use anyhow::{Context, Result};
use colored::*;
use std::env;

/// Main entry point for the `run` action.
///
/// The command is timed with a `ScopedTimer`; its report is printed whether the
/// command succeeds or fails, and a failure is returned afterwards.
pub fn handle(args: RunArgs) -> Result<()> {
    let settings = timer_settings(config_loader::load_config());

    let command_line = shlex::try_join(args.command.iter().map(String::as_str))
        .context("Could not quote the command line")?;
    let description = args.desc.clone().unwrap_or_else(|| command_line.clone());

    let mut timer = ScopedTimer::from_settings(&description, &settings)?;
    if let Some(precision) = args.precision {
        timer = timer.with_precision(precision)?;
    }
    if args.quiet {
        timer = timer.with_print(false);
    }

    let cwd = env::current_dir().context("Could not determine the current directory")?;
    log::debug!("Timing '{}' in '{}'", command_line, cwd.display());

    let outcome = timer.try_call(|| executor::execute_command(&command_line, &cwd));

    if let Some(reading) = args.reading {
        let seconds = timer.reading(reading)?;
        println!("{}", seconds.to_string().cyan());
    }

    outcome.with_context(|| format!("'{}' failed", command_line.yellow()))
}

/// Timer settings from the loaded config, or the defaults when loading failed.
/// An unreadable config never prevents a command from being timed.
fn timer_settings(loaded: Result<PerfConfig, ConfigError>) -> TimerSettings {
    match loaded {
        Ok(config) => config.timer,
        Err(e) => {
            log::warn!("Could not load config ({}); using default timer settings.", e);
            TimerSettings::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::paths::PathError;

    #[test]
    fn test_config_failure_falls_back_to_defaults() {
        let settings = timer_settings(Err(ConfigError::Path(PathError::ConfigDirNotFound)));
        assert_eq!(settings, TimerSettings::default());
    }

    #[test]
    fn test_loaded_config_is_used() {
        let mut config = PerfConfig::default();
        config.timer.precision = 2;
        config.timer.print = false;

        let settings = timer_settings(Ok(config));
        assert_eq!(settings.precision, 2);
        assert!(!settings.print);
    }
}
