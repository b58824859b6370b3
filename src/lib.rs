//! Dual-mode scoped timing: wrap a block with `ScopedTimer::scope`, or decorate a
//! closure with `ScopedTimer::decorate`, and read back a precision-controlled figure.

/// Command-line parsing and one handler per action.
pub mod cli;
/// Names, defaults and environment variables.
pub mod constants;
/// Scope lifecycle, timer, byte formatting and configuration.
pub mod core;
/// Configuration models.
pub mod models;
/// Process execution and the GPU query.
pub mod system;

pub use crate::core::bytes::human_bytes;
pub use crate::core::scope::{Disposition, ExitOutcome, Scope, ScopeAdapter, ScopeGuard};
pub use crate::core::timer::{Precision, Reading, ScopedTimer, TimerError, TimerState};
pub use crate::system::gpu::get_gpu_memory_usage;
