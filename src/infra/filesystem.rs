//! Filesystem operations
//!
//! Log directory and log file handling for build runs.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use crate::error::BuildError;

fn log_error(path: &Path, e: &std::io::Error) -> BuildError {
    BuildError::Log {
        path: path.to_path_buf(),
        error: e.to_string(),
    }
}

/// Anchor a relative path at the current directory
///
/// Tools run with their project directory as cwd, so every path handed to
/// them must not depend on ours.
pub fn absolute(path: &Path) -> io::Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

/// Create a directory and all parent directories
pub fn create_dir_all(path: &Path) -> Result<(), BuildError> {
    fs::create_dir_all(path).map_err(|e| log_error(path, &e))
}

/// Open a log file for writing, creating parent directories
///
/// Truncates unless `append` is set.
pub fn open_log(path: &Path, append: bool) -> Result<File, BuildError> {
    if let Some(parent) = path.parent() {
        create_dir_all(parent)?;
    }
    OpenOptions::new()
        .create(true)
        .write(true)
        .append(append)
        .truncate(!append)
        .open(path)
        .map_err(|e| log_error(path, &e))
}

/// Move a log to a new name, replacing any previous file there
///
/// Returns `false` when there was nothing to move.
pub fn preserve_log(from: &Path, to: &Path) -> Result<bool, BuildError> {
    if !from.exists() {
        return Ok(false);
    }
    fs::rename(from, to).map_err(|e| log_error(to, &e))?;
    Ok(true)
}

/// Copy a log into `dir` under `file_name`
pub fn collect_log(from: &Path, dir: &Path, file_name: &str) -> Result<(), BuildError> {
    create_dir_all(dir)?;
    let target = dir.join(file_name);
    fs::copy(from, &target).map_err(|e| log_error(&target, &e))?;
    Ok(())
}
