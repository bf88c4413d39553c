//! Core business logic module
//!
//! Descriptor parsing, the dependency graph, build sequencing and the
//! build executor. Process launching and log files live in
//! [`crate::infra`].
//!
//! # Submodules
//!
//! - [`project`] - Project descriptor parsing
//! - [`solution`] - Solution descriptor enumeration
//! - [`graph`] - Dependency graph construction
//! - [`resolver`] - Build sequencing with cycle detection
//! - [`builder`] - Build orchestration (passes, fallback, abort rules)
//! - [`settings`] - Layered configuration model
//! - [`tree`] - Dependency tree and build order rendering
//! - [`doctor`] - Tool and solution checks

pub mod builder;
pub mod doctor;
pub mod graph;
pub mod project;
pub mod resolver;
pub mod settings;
pub mod solution;
pub mod tree;
