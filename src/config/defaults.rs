//! Default configuration values

/// Project configuration file placed next to the solution
pub const PROJECT_CONFIG_FILE: &str = "solbuild.toml";

/// Global configuration file inside the config directory
pub const GLOBAL_CONFIG_FILE: &str = "config.toml";

/// Solution descriptor extension used for auto-discovery
pub const SOLUTION_EXTENSION: &str = "sln";

/// Default logs directory, relative to the solution directory
pub const DEFAULT_LOGS_DIR: &str = "build-logs";

/// Default failed-log collection directory, relative to the logs directory
pub const DEFAULT_FAILED_DIR: &str = "failed";

/// Run lock file name inside the data directory
pub const RUN_LOCK_FILE: &str = "solbuild.lock";

/// Passes used when the graph has no cycles
pub const ACYCLIC_PASSES: u32 = 1;

/// Passes used when at least one cycle was detected
pub const CYCLIC_PASSES: u32 = 2;

/// Default compiler argument template
pub const DEFAULT_COMPILE_ARGS: &[&str] = &[
    "{project}",
    "/configuration:{variant}",
    "/bin:{bin}",
    "/config:{config}",
];

/// Default generator argument template
pub const DEFAULT_GENERATE_ARGS: &[&str] = &["{project}", "/variant:{variant}", "/config:{config}"];
