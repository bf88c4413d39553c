//! Infrastructure layer
//!
//! Handles side effects: external processes, log files, platform
//! directories and the host-wide run lock.

pub mod dirs;
pub mod filesystem;
pub mod lock;
pub mod toolchain;
