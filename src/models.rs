// src/models.rs

use crate::constants::{DEFAULT_GPU_QUERY, DEFAULT_PRECISION};
use serde::{Deserialize, Serialize};

/// The contents of `perfscope.toml`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct PerfConfig {
    /// `[timer]` table.
    pub timer: TimerSettings,
    /// `[gpu]` table.
    pub gpu: GpuSettings,
}

/// Defaults applied to timers built from configuration.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct TimerSettings {
    /// Fractional digits in the report. `-1` disables rounding.
    pub precision: i32,
    /// Print a `[PERF ]` line on every scope exit.
    pub print: bool,
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            precision: i32::try_from(DEFAULT_PRECISION).unwrap_or(6),
            print: true,
        }
    }
}

/// Settings of the GPU memory query.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct GpuSettings {
    /// Command line that reports `<free>, <total>` memory in MiB for `{device}`.
    pub query_command: String,
}

impl Default for GpuSettings {
    fn default() -> Self {
        Self {
            query_command: DEFAULT_GPU_QUERY.to_string(),
        }
    }
}
