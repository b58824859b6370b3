// src/cli/handlers/mod.rs

// One module per CLI action.

/// `perfscope bytes`.
pub mod bytes;
/// `perfscope config`.
pub mod config;
/// `perfscope gpu`.
pub mod gpu;
/// `perfscope run`.
pub mod run;
