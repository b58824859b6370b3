// src/constants.rs

/// The prefix of every report line printed by a `ScopedTimer`.
pub const PERF_REPORT_PREFIX: &str = "[PERF ]";

/// Fractional digits used when no precision is configured.
pub const DEFAULT_PRECISION: usize = 6;

/// The name of the directory holding perfscope configuration (inside the system config dir).
pub const CONFIG_DIR_NAME: &str = "perfscope";

/// The name of the configuration file (inside the config directory).
pub const CONFIG_FILENAME: &str = "perfscope.toml";

/// Points at an explicit configuration file, bypassing the config directory.
pub const ENV_CONFIG_PATH: &str = "PERFSCOPE_CONFIG";

/// Overrides `[timer] precision`.
pub const ENV_PRECISION: &str = "PERFSCOPE_PRECISION";

/// Overrides `[timer] print`.
pub const ENV_PRINT: &str = "PERFSCOPE_PRINT";

/// The query run for `perfscope gpu`. `{device}` is replaced by the device index.
/// The tool is expected to print `<free>, <total>` in MiB.
pub const DEFAULT_GPU_QUERY: &str =
    "nvidia-smi --query-gpu=memory.free,memory.total --format=csv,noheader,nounits -i {device}";
