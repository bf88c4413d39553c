//! Error types for solbuild
//!
//! Domain-specific error types using thiserror.

use std::path::PathBuf;
use thiserror::Error;

/// Solution or project descriptor errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Descriptor file does not exist
    #[error("Descriptor not found: {path}")]
    NotFound { path: PathBuf },

    /// Descriptor could not be read
    #[error("IO error for '{path}': {error}")]
    Io { path: PathBuf, error: String },

    /// Descriptor content does not match the expected structure
    #[error("Malformed descriptor '{path}': {message}")]
    Malformed { path: PathBuf, message: String },

    /// Required field missing or empty
    #[error("Descriptor '{path}' is missing required field '{field}'")]
    MissingField { path: PathBuf, field: String },
}

impl ParseError {
    /// Map an IO error on `path` to the matching parse error
    pub fn from_io(path: &std::path::Path, error: &std::io::Error) -> Self {
        if error.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            Self::Io {
                path: path.to_path_buf(),
                error: error.to_string(),
            }
        }
    }
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file '{path}': {error}")]
    Read { path: PathBuf, error: String },

    /// Failed to parse config file
    #[error("Failed to parse config file '{path}': {error}")]
    Parse { path: PathBuf, error: String },

    /// A tool needed for this run is not configured
    #[error("No {tool} configured. Set [tools].{tool} in solbuild.toml")]
    MissingTool { tool: String },

    /// No solution file could be selected
    #[error("{message}")]
    Solution { message: String },
}

/// Build errors
#[derive(Error, Debug)]
pub enum BuildError {
    /// External tool could not be started
    #[error("Failed to launch {tool} '{program}': {error}")]
    ToolLaunch {
        tool: String,
        program: PathBuf,
        error: String,
    },

    /// Log file or directory could not be prepared
    #[error("Log error for '{path}': {error}")]
    Log { path: PathBuf, error: String },
}

/// Run lock errors
#[derive(Error, Debug)]
pub enum LockError {
    /// Lock file could not be created or locked
    #[error("Failed to acquire run lock '{path}': {error}")]
    Acquire { path: PathBuf, error: String },
}

/// Command-level errors not owned by a single concern
#[derive(Error, Debug)]
pub enum SolbuildError {
    /// Project not present in the solution
    #[error("Project '{name}' not found in solution")]
    ProjectNotFound { name: String },
}
