//! Host-wide run lock
//!
//! The generator cannot run twice at once on the same host, so whole build
//! runs are serialized through an exclusive advisory lock on a file.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::error::LockError;

/// Exclusive lock held for the duration of a build run
///
/// Released when dropped.
#[derive(Debug)]
pub struct RunLock {
    file: File,
    path: PathBuf,
}

impl RunLock {
    /// Acquire the lock, blocking while another run holds it
    pub fn acquire(path: &Path) -> Result<Self, LockError> {
        if let Some(lock) = Self::try_acquire(path)? {
            return Ok(lock);
        }

        tracing::info!("Waiting for another build run to finish ({})", path.display());
        let file = Self::open(path)?;
        file.lock_exclusive().map_err(|e| Self::error(path, &e))?;

        tracing::debug!("Acquired run lock at {}", path.display());
        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }

    /// Try to acquire the lock without blocking
    ///
    /// Returns `Ok(None)` if another run holds it.
    pub fn try_acquire(path: &Path) -> Result<Option<Self>, LockError> {
        let file = Self::open(path)?;

        match file.try_lock_exclusive() {
            Ok(()) => {
                tracing::debug!("Acquired run lock at {}", path.display());
                Ok(Some(Self {
                    file,
                    path: path.to_path_buf(),
                }))
            }
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => Ok(None),
            Err(e) => Err(Self::error(path, &e)),
        }
    }

    /// Path of the lock file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open(path: &Path) -> Result<File, LockError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| Self::error(path, &e))?;
        }
        File::create(path).map_err(|e| Self::error(path, &e))
    }

    fn error(path: &Path, e: &std::io::Error) -> LockError {
        LockError::Acquire {
            path: path.to_path_buf(),
            error: e.to_string(),
        }
    }
}

impl Drop for RunLock {
    fn drop(&mut self) {
        if let Err(e) = self.file.unlock() {
            tracing::warn!("Failed to release run lock {}: {e}", self.path.display());
        }
    }
}
