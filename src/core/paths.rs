// src/core/paths.rs

use crate::constants::{CONFIG_DIR_NAME, CONFIG_FILENAME, ENV_CONFIG_PATH};
use lazy_static::lazy_static;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use thiserror::Error;

lazy_static! {
    static ref PERFSCOPE_CONFIG_DIR: Mutex<Option<PathBuf>> = Mutex::new(None);
}

/// Failures while locating the configuration directory.
#[derive(Error, Debug)]
pub enum PathError {
    /// The platform has no config directory.
    #[error("Could not find system config directory.")]
    ConfigDirNotFound,
    /// The directory exists nowhere and could not be made.
    #[error("Could not create config directory at '{path}': {source}")]
    ConfigDirCreation {
        /// The directory that was being created.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Returns the path to the perfscope configuration directory (`~/.config/perfscope`).
/// Creates it if it doesn't exist.
///
/// The first call computes and caches the path; later calls return the cached value.
pub fn get_config_dir() -> Result<PathBuf, PathError> {
    let mut cached_path_guard = PERFSCOPE_CONFIG_DIR
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());

    if let Some(path) = &*cached_path_guard {
        return Ok(path.clone());
    }

    let config_path = dirs::config_dir()
        .ok_or(PathError::ConfigDirNotFound)?
        .join(CONFIG_DIR_NAME);

    if !config_path.exists() {
        log::debug!("Creating config directory '{}'", config_path.display());
        fs::create_dir_all(&config_path).map_err(|e| PathError::ConfigDirCreation {
            path: config_path.display().to_string(),
            source: e,
        })?;
    }

    *cached_path_guard = Some(config_path.clone());
    Ok(config_path)
}

/// Returns the path of `perfscope.toml`.
///
/// `$PERFSCOPE_CONFIG` wins when set; otherwise the file lives in the config directory.
pub fn get_config_file_path() -> Result<PathBuf, PathError> {
    match env::var_os(ENV_CONFIG_PATH) {
        Some(explicit) if !explicit.is_empty() => {
            Ok(dunce::simplified(&PathBuf::from(explicit)).to_path_buf())
        }
        _ => get_config_dir().map(|dir| dir.join(CONFIG_FILENAME)),
    }
}
