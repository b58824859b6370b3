// src/bin/perfscope.rs

use anyhow::Result;
use clap::Parser;
use colored::*;
use perfscope::cli::{Action, Cli, handlers};

/// The main entry point of the `perfscope` application.
/// It sets up logging, parses arguments, dispatches to the correct handler,
/// and performs centralized error handling.
fn main() {
    env_logger::init();

    if let Err(e) = run_cli(Cli::parse()) {
        eprintln!("\n{}: {:#}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run_cli(cli: Cli) -> Result<()> {
    log::debug!("CLI args parsed: {:?}", cli);

    match cli.action {
        Action::Run(args) => handlers::run::handle(args),
        Action::Bytes(args) => handlers::bytes::handle(args),
        Action::Gpu(args) => handlers::gpu::handle(args),
        Action::Config => handlers::config::handle(),
    }
}
