// src/cli/handlers/gpu.rs

use crate::{cli::args::GpuArgs, core::config_loader, system::gpu};
use anyhow::Result;
use colored::*;

/// Queries the configured GPU tool and prints the free/total lines.
pub fn handle(args: GpuArgs) -> Result<()> {
    let config = config_loader::load_config()?;
    let memory = gpu::query_gpu_memory(args.device, &config.gpu)?;
    let (free, total) = memory.labeled();

    println!("{} {}", "GPU".blue().bold(), args.device);
    println!("  {}", free);
    println!("  {}", total);
    Ok(())
}
