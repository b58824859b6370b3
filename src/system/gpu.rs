// src/system/gpu.rs

//! Accelerator memory query. Runs the vendor tool configured in `[gpu] query_command`
//! and turns its `<free>, <total>` MiB report into byte counts.

use crate::{
    core::bytes::human_bytes,
    models::GpuSettings,
    system::executor::{self, ExecutionError},
};
use std::env;
use thiserror::Error;

const MIB: u64 = 1024 * 1024;

/// Failures of the GPU memory query.
#[derive(Error, Debug)]
pub enum GpuError {
    /// The query tool is missing or failed.
    #[error("GPU query failed: {0}")]
    Execution(#[from] ExecutionError),
    /// The tool's output was not a `<free>, <total>` line.
    #[error("Could not parse GPU query output '{output}': {reason}")]
    Parse {
        /// The trimmed output.
        output: String,
        /// What was wrong with it.
        reason: String,
    },
}

/// Free and total memory of one device, in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GpuMemory {
    /// Unallocated memory.
    pub free: u64,
    /// Device capacity.
    pub total: u64,
}

impl GpuMemory {
    /// Returns `("Free: <size>", "Total: <size>")`.
    pub fn labeled(&self) -> (String, String) {
        (
            format!("Free: {}", human_bytes(self.free as f64)),
            format!("Total: {}", human_bytes(self.total as f64)),
        )
    }
}

/// Parses the first line of a `<free>, <total>` report given in MiB.
pub fn parse_memory_report(output: &str) -> Result<GpuMemory, GpuError> {
    let parse_error = |reason: &str| GpuError::Parse {
        output: output.trim().to_string(),
        reason: reason.to_string(),
    };

    let line = output
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .ok_or_else(|| parse_error("empty output"))?;

    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    let [free, total] = fields.as_slice() else {
        return Err(parse_error("expected exactly two comma-separated fields"));
    };

    let to_bytes = |field: &str| -> Result<u64, GpuError> {
        let mib = field
            .parse::<u64>()
            .map_err(|e| parse_error(&format!("'{}' is not a MiB count: {}", field, e)))?;
        mib.checked_mul(MIB)
            .ok_or_else(|| parse_error(&format!("'{}' MiB overflows", field)))
    };

    Ok(GpuMemory {
        free: to_bytes(*free)?,
        total: to_bytes(*total)?,
    })
}

/// Queries free/total memory of `device` using the configured command.
pub fn query_gpu_memory(device: u32, settings: &GpuSettings) -> Result<GpuMemory, GpuError> {
    let command_line = settings
        .query_command
        .replace("{device}", &device.to_string());
    log::debug!("Querying GPU memory: {}", command_line);

    let cwd = env::current_dir()
        .map_err(|e| ExecutionError::CommandFailed(command_line.clone(), e))?;
    let output = executor::execute_and_capture_output(&command_line, &cwd)?;
    let memory = parse_memory_report(&output)?;
    log::debug!("Device {}: {:?}", device, memory);
    Ok(memory)
}

/// Returns the labeled free/total memory strings for `device` using default settings.
pub fn get_gpu_memory_usage(device: u32) -> Result<(String, String), GpuError> {
    query_gpu_memory(device, &GpuSettings::default()).map(|memory| memory.labeled())
}
