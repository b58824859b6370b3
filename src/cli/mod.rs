// src/cli/mod.rs

use clap::{Parser, Subcommand};

/// Arguments of each action.
pub mod args;
/// One `handle` function per action.
pub mod handlers;

/// perfscope: time a command, a block or a closure with a precision-controlled report.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    long_about = None,
    styles = clap::builder::Styles::styled()
        .header(clap::builder::styling::AnsiColor::Yellow.on_default().bold())
        .usage(clap::builder::styling::AnsiColor::Yellow.on_default().bold())
        .literal(clap::builder::styling::AnsiColor::Cyan.on_default().bold())
        .placeholder(clap::builder::styling::AnsiColor::Green.on_default()),
)]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    /// The action to perform.
    #[command(subcommand)]
    pub action: Action,
}

/// The actions `perfscope` understands.
#[derive(Subcommand, Debug)]
pub enum Action {
    /// Time an external command: `perfscope run -- cargo build`.
    Run(args::RunArgs),
    /// Print byte counts in human friendly units.
    Bytes(args::BytesArgs),
    /// Show free and total memory of a GPU.
    Gpu(args::GpuArgs),
    /// Print the effective configuration as TOML.
    Config,
}
