// src/cli/args.rs
use crate::core::timer::Reading;
use clap::Args;

/// Arguments of `perfscope run`.
#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Label for the report line. Defaults to the command itself.
    #[arg(long, short)]
    pub desc: Option<String>,

    /// Fractional digits in the report (-1 disables rounding). Overrides the config file.
    #[arg(long, short, allow_negative_numbers = true)]
    pub precision: Option<i32>,

    /// Do not print the `[PERF ]` line.
    #[arg(long, short)]
    pub quiet: bool,

    /// Also print the measured seconds on their own line: `rounded` or `raw`.
    #[arg(long)]
    pub reading: Option<Reading>,

    /// The command to time, after `--`.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
    pub command: Vec<String>,
}

/// Arguments of `perfscope bytes`.
#[derive(Args, Debug, Default)]
pub struct BytesArgs {
    /// One or more byte counts.
    #[arg(required = true, allow_negative_numbers = true)]
    pub values: Vec<f64>,
}

/// Arguments of `perfscope gpu`.
#[derive(Args, Debug, Default)]
pub struct GpuArgs {
    /// Index of the device to query.
    #[arg(long, short, default_value_t = 0)]
    pub device: u32,
}
