// src/system/executor.rs

use std::io::ErrorKind;
use std::path::Path;
use std::process::{Command as StdCommand, ExitStatus, Stdio};
use thiserror::Error;

/// Failures while spawning or waiting on an external command.
#[derive(Error, Debug)]
pub enum ExecutionError {
    /// The command line has unbalanced quotes.
    #[error("Command could not be parsed: {0}")]
    CommandParse(String),
    /// The command line is blank.
    #[error("No command specified to run.")]
    EmptyCommand,
    /// The program could not be spawned.
    #[error("Command '{0}' could not be executed: {1}")]
    CommandFailed(String, std::io::Error),
    /// The program ran and failed.
    #[error("Command '{command}' exited with a non-zero error code ({code}).")]
    NonZeroExitStatus {
        /// The command line as given.
        command: String,
        /// Exit code, or a note that a signal ended it.
        code: String,
    },
    /// Captured stdout was not UTF-8.
    #[error("Command '{command}' produced output that was not valid UTF-8")]
    InvalidUtf8Output {
        /// The command line as given.
        command: String,
        /// The decoding error.
        #[source]
        source: std::string::FromUtf8Error,
    },
}

fn describe_status(status: ExitStatus) -> String {
    status
        .code()
        .map(|c| c.to_string())
        .unwrap_or_else(|| "terminated by signal".to_string())
}

/// Splits `command_line` into a program and its arguments.
fn split_command(command_line: &str) -> Result<(String, Vec<String>), ExecutionError> {
    let trimmed_command = command_line.trim();
    if trimmed_command.is_empty() {
        return Err(ExecutionError::EmptyCommand);
    }
    let mut parts = shlex::split(trimmed_command)
        .ok_or_else(|| ExecutionError::CommandParse(trimmed_command.to_string()))?
        .into_iter();
    let program = parts.next().ok_or(ExecutionError::EmptyCommand)?;
    Ok((program, parts.collect()))
}

/// Spawns a command with inherited stdio and waits for it to finish.
pub fn execute_command(command_line: &str, cwd: &Path) -> Result<(), ExecutionError> {
    let (program, args) = split_command(command_line)?;
    let clean_cwd = dunce::simplified(cwd);
    let trimmed_command = command_line.trim().to_string();

    let mut command = StdCommand::new(&program);
    command
        .args(&args)
        .current_dir(clean_cwd)
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());

    // Fallback for Windows built-ins like `echo`: retry through `cmd /C`.
    let status = match command.status() {
        Ok(status) => status,
        Err(e) if e.kind() == ErrorKind::NotFound && cfg!(target_os = "windows") => {
            log::debug!("Command '{}' not found. Retrying with cmd /C.", program);
            StdCommand::new("cmd")
                .arg("/C")
                .arg(&trimmed_command)
                .current_dir(clean_cwd)
                .status()
                .map_err(|e| ExecutionError::CommandFailed(trimmed_command.clone(), e))?
        }
        Err(e) => return Err(ExecutionError::CommandFailed(trimmed_command, e)),
    };

    if !status.success() {
        return Err(ExecutionError::NonZeroExitStatus {
            code: describe_status(status),
            command: trimmed_command,
        });
    }
    Ok(())
}

/// Executes a command and captures its standard output.
/// Stderr is passed through to the user's terminal.
pub fn execute_and_capture_output(command_line: &str, cwd: &Path) -> Result<String, ExecutionError> {
    let (program, args) = split_command(command_line)?;
    let trimmed_command = command_line.trim().to_string();

    let command_output = StdCommand::new(&program)
        .args(&args)
        .current_dir(dunce::simplified(cwd))
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .output()
        .map_err(|e| ExecutionError::CommandFailed(trimmed_command.clone(), e))?;

    if !command_output.status.success() {
        return Err(ExecutionError::NonZeroExitStatus {
            code: describe_status(command_output.status),
            command: trimmed_command,
        });
    }

    String::from_utf8(command_output.stdout).map_err(|e| ExecutionError::InvalidUtf8Output {
        command: trimmed_command,
        source: e,
    })
}
