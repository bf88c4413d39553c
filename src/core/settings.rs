//! Build configuration
//!
//! Layered TOML settings (global `config.toml`, project `solbuild.toml`,
//! command-line overrides) resolved into an explicit [`BuildConfig`] that is
//! handed to the executor and the tool wrapper.

use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::defaults;
use crate::error::ConfigError;
use crate::infra::dirs::SolbuildDirs;

/// Build variant
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Debug build with diagnostic instrumentation
    #[default]
    Debug,
    /// Release build
    Release,
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Debug => write!(f, "Debug"),
            Self::Release => write!(f, "Release"),
        }
    }
}

impl std::str::FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Ok(Self::Debug),
            "release" => Ok(Self::Release),
            other => Err(format!("unknown variant '{other}' (expected debug or release)")),
        }
    }
}

/// Settings as written in a config file
///
/// Every field is optional so files can be layered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// External tools
    #[serde(default)]
    pub tools: ToolSettings,

    /// Build policy
    #[serde(default)]
    pub build: BuildSettings,

    /// Log locations
    #[serde(default)]
    pub logs: LogSettings,
}

/// `[tools]` section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolSettings {
    /// Compiler executable
    pub compiler: Option<PathBuf>,

    /// Generator executable
    pub generator: Option<PathBuf>,

    /// Tool binaries directory passed to the compiler
    pub bin_dir: Option<PathBuf>,

    /// Tool configuration directory
    pub config_dir: Option<PathBuf>,

    /// Compiler argument template
    pub compile_args: Option<Vec<String>>,

    /// Generator argument template
    pub generate_args: Option<Vec<String>>,
}

/// `[build]` section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildSettings {
    /// Variant to build
    pub variant: Option<Variant>,

    /// Abort a pass on the first final failure
    pub stop_on_error: Option<bool>,

    /// Projects whose failure aborts the pass
    pub critical: Option<Vec<String>>,
}

/// `[logs]` section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogSettings {
    /// Per-project log directory
    pub dir: Option<PathBuf>,

    /// Directory collecting logs of failed projects
    pub failed_dir: Option<PathBuf>,
}

/// Resolved external tool configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolConfig {
    /// Compiler executable
    pub compiler: Option<PathBuf>,
    /// Generator executable
    pub generator: Option<PathBuf>,
    /// Tool binaries directory
    pub bin_dir: PathBuf,
    /// Tool configuration directory
    pub config_dir: PathBuf,
    /// Compiler argument template
    pub compile_args: Vec<String>,
    /// Generator argument template
    pub generate_args: Vec<String>,
}

/// Fully resolved configuration for one build run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    /// Variant to build
    pub variant: Variant,
    /// Abort a pass on the first final failure (acyclic runs only)
    pub stop_on_error: bool,
    /// Projects whose failure aborts the pass
    pub critical: BTreeSet<String>,
    /// Per-project log directory
    pub logs_dir: PathBuf,
    /// Failed log collection directory
    pub failed_dir: PathBuf,
    /// External tools
    pub tools: ToolConfig,
}

impl BuildConfig {
    /// Whether a project is designated critical
    pub fn is_critical(&self, name: &str) -> bool {
        self.critical.contains(name)
    }
}

fn owned_args(args: &[&str]) -> Vec<String> {
    args.iter().map(|a| (*a).to_string()).collect()
}

fn resolve_path(base: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}

impl Settings {
    /// Load settings from a specific path
    ///
    /// A missing file yields empty settings; an invalid one is an error.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::from_toml(&content).map_err(|error| ConfigError::Parse {
            path: path.to_path_buf(),
            error,
        })
    }

    /// Parse settings from TOML text
    pub fn from_toml(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Load the global settings followed by the project settings
    ///
    /// `explicit` replaces the project file next to the solution.
    pub fn load_layered(
        dirs: &SolbuildDirs,
        solution_dir: &Path,
        explicit: Option<&Path>,
    ) -> Result<Self, ConfigError> {
        let global_path = dirs.global_config_path();
        let global = Self::load_from_path(&global_path)?;

        let project = match explicit {
            Some(path) if !path.exists() => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    error: "file does not exist".to_string(),
                })
            }
            Some(path) => Self::load_from_path(path)?,
            None => Self::load_from_path(&solution_dir.join(defaults::PROJECT_CONFIG_FILE))?,
        };

        tracing::debug!("Loaded settings (global: {})", global_path.display());
        Ok(global.merge(project))
    }

    /// Overlay `other` on top of `self`; set fields in `other` win
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        Self {
            tools: ToolSettings {
                compiler: other.tools.compiler.or(self.tools.compiler),
                generator: other.tools.generator.or(self.tools.generator),
                bin_dir: other.tools.bin_dir.or(self.tools.bin_dir),
                config_dir: other.tools.config_dir.or(self.tools.config_dir),
                compile_args: other.tools.compile_args.or(self.tools.compile_args),
                generate_args: other.tools.generate_args.or(self.tools.generate_args),
            },
            build: BuildSettings {
                variant: other.build.variant.or(self.build.variant),
                stop_on_error: other.build.stop_on_error.or(self.build.stop_on_error),
                critical: other.build.critical.or(self.build.critical),
            },
            logs: LogSettings {
                dir: other.logs.dir.or(self.logs.dir),
                failed_dir: other.logs.failed_dir.or(self.logs.failed_dir),
            },
        }
    }

    /// Resolve into a [`BuildConfig`]
    ///
    /// Relative log paths are taken relative to `solution_dir`; the failed
    /// directory defaults to a subdirectory of the logs directory.
    pub fn resolve(self, solution_dir: &Path) -> BuildConfig {
        let logs_dir = resolve_path(
            solution_dir,
            self.logs
                .dir
                .unwrap_or_else(|| PathBuf::from(defaults::DEFAULT_LOGS_DIR)),
        );
        let failed_dir = match self.logs.failed_dir {
            Some(dir) => resolve_path(solution_dir, dir),
            None => logs_dir.join(defaults::DEFAULT_FAILED_DIR),
        };

        BuildConfig {
            variant: self.build.variant.unwrap_or_default(),
            stop_on_error: self.build.stop_on_error.unwrap_or(false),
            critical: self.build.critical.unwrap_or_default().into_iter().collect(),
            logs_dir,
            failed_dir,
            tools: ToolConfig {
                compiler: self.tools.compiler,
                generator: self.tools.generator,
                bin_dir: self.tools.bin_dir.unwrap_or_default(),
                config_dir: self.tools.config_dir.unwrap_or_default(),
                compile_args: self
                    .tools
                    .compile_args
                    .unwrap_or_else(|| owned_args(defaults::DEFAULT_COMPILE_ARGS)),
                generate_args: self
                    .tools
                    .generate_args
                    .unwrap_or_else(|| owned_args(defaults::DEFAULT_GENERATE_ARGS)),
            },
        }
    }
}
