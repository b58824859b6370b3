// src/cli/handlers/config.rs

use crate::core::{config_loader, paths};
use anyhow::Result;
use colored::*;

/// Prints where the config file lives and the effective settings.
pub fn handle() -> Result<()> {
    let path = paths::get_config_file_path()?;
    let config = config_loader::load_config()?;

    println!("{} {}", "# file:".dimmed(), path.display());
    print!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}
