//! # Config Loader
//!
//! Loads `perfscope.toml` and layers the `PERFSCOPE_*` environment overrides on top.
//! A missing file is replaced by the defaults, which are written to disk so the user
//! has something to edit.
use crate::{
    constants::{ENV_PRECISION, ENV_PRINT},
    core::{paths, timer::Precision},
    models::PerfConfig,
};
use std::{env, fs, path::Path};
use thiserror::Error;

/// Failures while loading or writing `perfscope.toml`.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Reading or writing the file failed.
    #[error("Filesystem Error: {0}")]
    Io(#[from] std::io::Error),
    /// The file location could not be resolved.
    #[error("Could not locate the perfscope config file: {0}")]
    Path(#[from] paths::PathError),
    /// The file is not valid TOML for `PerfConfig`.
    #[error("Failed to parse '{path}': {source}")]
    TomlParse {
        /// The offending file.
        path: String,
        /// The parser error.
        #[source]
        source: toml::de::Error,
    },
    /// The defaults could not be serialized.
    #[error("Failed to serialize config to TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
    /// A `PERFSCOPE_*` variable holds an unusable value.
    #[error("Invalid value '{value}' for {key}: {reason}")]
    InvalidOverride {
        /// The environment variable.
        key: &'static str,
        /// Its raw value.
        value: String,
        /// Why it was rejected.
        reason: String,
    },
}

/// Loads the effective configuration: file (or defaults) plus environment overrides.
pub fn load_config() -> Result<PerfConfig, ConfigError> {
    let config_path = paths::get_config_file_path()?;
    let config = if config_path.exists() {
        load_config_from(&config_path)?
    } else {
        log::debug!(
            "No config at '{}', writing defaults.",
            config_path.display()
        );
        let default_config = PerfConfig::default();
        write_config(&config_path, &default_config)?;
        default_config
    };
    apply_env_overrides(config, |key| env::var(key).ok())
}

/// Reads and parses a specific config file. Nothing is written.
pub fn load_config_from(path: &Path) -> Result<PerfConfig, ConfigError> {
    log::debug!("Loading config from '{}'", path.display());
    let content = fs::read_to_string(path)?;
    toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
        path: path.display().to_string(),
        source: e,
    })
}

/// Serializes `config` to `path`, creating parent directories as needed.
pub fn write_config(path: &Path, config: &PerfConfig) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let toml_string = toml::to_string_pretty(config)?;
    fs::write(path, toml_string)?;
    Ok(())
}

/// Applies `PERFSCOPE_PRECISION` and `PERFSCOPE_PRINT` as returned by `lookup`.
pub fn apply_env_overrides<F>(mut config: PerfConfig, lookup: F) -> Result<PerfConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(raw) = lookup(ENV_PRECISION) {
        let precision = raw
            .trim()
            .parse::<i32>()
            .map_err(|e| e.to_string())
            .and_then(|p| Precision::try_from(p).map(|_| p).map_err(|e| e.to_string()))
            .map_err(|reason| ConfigError::InvalidOverride {
                key: ENV_PRECISION,
                value: raw.clone(),
                reason,
            })?;
        log::debug!("{} overrides precision to {}", ENV_PRECISION, precision);
        config.timer.precision = precision;
    }

    if let Some(raw) = lookup(ENV_PRINT) {
        config.timer.print = parse_flag(&raw).ok_or_else(|| ConfigError::InvalidOverride {
            key: ENV_PRINT,
            value: raw.clone(),
            reason: "expected one of 1/0, true/false, yes/no, on/off".to_string(),
        })?;
    }

    Ok(config)
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
