//! Solbuild - dependency-ordered solution builder
//!
//! Reads a solution and its project descriptors, orders the projects by
//! their references and drives an external generator and compiler over
//! them, tolerating circular references with a second pass.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`cli`] - Command-line interface parsing and output formatting
//! - [`core`] - Parsing, graph, sequencing and build orchestration
//! - [`infra`] - Infrastructure layer (processes, log files, locking)
//! - [`config`] - Configuration constants
//! - [`error`] - Error types and handling

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod infra;

#[cfg(test)]
pub mod test_utils;
