//! # System Interaction Layer
//!
//! Boundary between the timing core and the operating system.
//!
//! ## Modules
//!
//! - **`executor`**: spawns external commands, either with inherited stdio or with
//!   stdout captured.
//! - **`gpu`**: runs the configured accelerator query and parses its memory report.

/// Spawning and capturing external commands.
pub mod executor;
/// GPU memory query.
pub mod gpu;
