// src/core/mod.rs

/// Human friendly byte counts.
pub mod bytes;
/// Loading `perfscope.toml`.
pub mod config_loader;
/// Config directory resolution.
pub mod paths;
/// The `Scope` lifecycle and `ScopeAdapter`.
pub mod scope;
/// `ScopedTimer`.
pub mod timer;
