//! CLI command implementations
//!
//! Each command is implemented in its own submodule.

pub mod build;
pub mod doctor;
pub mod order;
pub mod tree;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Subcommand;
use walkdir::WalkDir;

use crate::config::defaults;
use crate::core::graph::DependencyGraph;
use crate::core::resolver::{self, Sequence};
use crate::core::settings::Variant;
use crate::core::solution::Solution;
use crate::error::ConfigError;
use crate::infra::filesystem;

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build every project in dependency order
    Build {
        /// Solution file (defaults to the only *.sln in the current directory)
        solution: Option<PathBuf>,

        /// Variant to build
        #[arg(long)]
        variant: Option<Variant>,

        /// Stop at the first failed project (ignored when references are circular)
        #[arg(long)]
        stop_on_error: bool,

        /// Project whose failure aborts the pass (repeatable)
        #[arg(long = "critical", value_name = "NAME")]
        critical: Vec<String>,

        /// Settings file used instead of solbuild.toml next to the solution
        #[arg(long, value_name = "PATH")]
        config: Option<PathBuf>,

        /// Directory for build logs
        #[arg(long, value_name = "DIR", env = "SOLBUILD_LOGS_DIR")]
        logs: Option<PathBuf>,
    },

    /// Print the build order
    Order {
        /// Solution file (defaults to the only *.sln in the current directory)
        solution: Option<PathBuf>,
    },

    /// Display dependency tree
    Tree {
        /// Solution file (defaults to the only *.sln in the current directory)
        solution: Option<PathBuf>,

        /// Show dependencies for specific project
        project: Option<String>,

        /// Output in DOT graph format
        #[arg(long)]
        graph: bool,
    },

    /// Check tools and solution
    Doctor {
        /// Solution file (defaults to the only *.sln in the current directory)
        solution: Option<PathBuf>,
    },
}

impl Commands {
    /// Execute the command, returning the process exit code
    pub fn run(self) -> Result<i32> {
        match self {
            Self::Build {
                solution,
                variant,
                stop_on_error,
                critical,
                config,
                logs,
            } => build::execute(build::BuildOptions {
                solution,
                variant,
                stop_on_error,
                critical,
                config,
                logs,
            }),
            Self::Order { solution } => order::execute(solution),
            Self::Tree {
                solution,
                project,
                graph,
            } => tree::execute(solution, project.as_deref(), graph),
            Self::Doctor { solution } => doctor::execute(solution),
        }
    }
}

/// A solution with its graph and build order
#[derive(Debug)]
pub struct LoadedSolution {
    /// Parsed solution
    pub solution: Solution,
    /// Dependency graph of its projects
    pub graph: DependencyGraph,
    /// Build order and detected cycles
    pub sequence: Sequence,
}

/// Use `explicit` or find the solution in the current directory
pub fn resolve_solution(explicit: Option<PathBuf>) -> Result<PathBuf> {
    match explicit {
        Some(path) => filesystem::absolute(&path)
            .with_context(|| format!("Failed to resolve {}", path.display())),
        None => {
            let cwd = std::env::current_dir().context("Failed to get current directory")?;
            Ok(find_solution(&cwd)?)
        }
    }
}

/// Find the single solution file directly inside `dir`
pub fn find_solution(dir: &Path) -> Result<PathBuf, ConfigError> {
    let mut candidates: Vec<PathBuf> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(walkdir::DirEntry::into_path)
        .filter(|p| {
            p.extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case(defaults::SOLUTION_EXTENSION))
        })
        .collect();
    candidates.sort();

    match candidates.len() {
        0 => Err(ConfigError::Solution {
            message: format!(
                "No .{} file found in {}",
                defaults::SOLUTION_EXTENSION,
                dir.display()
            ),
        }),
        1 => Ok(candidates.remove(0)),
        n => Err(ConfigError::Solution {
            message: format!(
                "Found {n} .{} files in {}; pass the one to use",
                defaults::SOLUTION_EXTENSION,
                dir.display()
            ),
        }),
    }
}

/// Parse a solution, build its graph and compute the build order
pub fn load_solution(path: &Path) -> Result<LoadedSolution> {
    let solution = Solution::load(path)
        .with_context(|| format!("Failed to load solution {}", path.display()))?;
    let graph = DependencyGraph::from_entries(&solution.entries);
    let sequence = resolver::sequence(&graph);

    for cycle in &sequence.cycles {
        tracing::warn!("Circular dependency: {}", cycle.join(" -> "));
    }

    Ok(LoadedSolution {
        solution,
        graph,
        sequence,
    })
}
