//! Platform-specific directory management
//!
//! Provides the config and data directories used by solbuild.
//! Follows XDG Base Directory Specification on Linux and standard locations on macOS.
//!
//! Environment variables can override default directories:
//! - `SOLBUILD_CONFIG_DIR` - Override config directory
//! - `SOLBUILD_DATA_DIR` - Override data directory

use std::env;
use std::path::PathBuf;

use crate::config::defaults;

/// Environment variable names for directory overrides
pub const ENV_CONFIG_DIR: &str = "SOLBUILD_CONFIG_DIR";
pub const ENV_DATA_DIR: &str = "SOLBUILD_DATA_DIR";

/// Application name used in directory paths
const APP_NAME: &str = "solbuild";

/// Platform-specific directory provider
#[derive(Debug, Clone)]
pub struct SolbuildDirs {
    config_dir: PathBuf,
    data_dir: PathBuf,
}

impl SolbuildDirs {
    /// Create a new `SolbuildDirs` instance
    ///
    /// Checks environment variables first, then falls back to platform defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config_dir: Self::resolve(ENV_CONFIG_DIR, dirs::config_dir, &[".config"]),
            data_dir: Self::resolve(ENV_DATA_DIR, dirs::data_dir, &[".local", "share"]),
        }
    }

    /// Use explicit directories
    #[must_use]
    pub fn with_paths(config_dir: PathBuf, data_dir: PathBuf) -> Self {
        Self {
            config_dir,
            data_dir,
        }
    }

    /// Get the config directory path
    ///
    /// - Linux: `$XDG_CONFIG_HOME/solbuild` or `~/.config/solbuild`
    /// - macOS: `~/Library/Application Support/solbuild`
    #[must_use]
    pub fn config_dir(&self) -> PathBuf {
        self.config_dir.clone()
    }

    /// Get the data directory path
    ///
    /// - Linux: `$XDG_DATA_HOME/solbuild` or `~/.local/share/solbuild`
    /// - macOS: `~/Library/Application Support/solbuild`
    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone()
    }

    /// Get the global config file path
    #[must_use]
    pub fn global_config_path(&self) -> PathBuf {
        self.config_dir.join(defaults::GLOBAL_CONFIG_FILE)
    }

    /// Get the run lock path
    ///
    /// Shared by every solution built by this user, since the generator
    /// may only run once per host.
    #[must_use]
    pub fn run_lock_path(&self) -> PathBuf {
        self.data_dir.join(defaults::RUN_LOCK_FILE)
    }

    fn resolve(var: &str, platform: fn() -> Option<PathBuf>, home_fallback: &[&str]) -> PathBuf {
        if let Ok(path) = env::var(var) {
            return PathBuf::from(path);
        }

        platform().map(|p| p.join(APP_NAME)).unwrap_or_else(|| {
            let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
            home_fallback
                .iter()
                .fold(home, |acc, part| acc.join(part))
                .join(APP_NAME)
        })
    }
}

impl Default for SolbuildDirs {
    fn default() -> Self {
        Self::new()
    }
}
