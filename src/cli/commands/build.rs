//! Build command implementation
//!
//! Implements `solbuild build`: load the solution, resolve settings, take
//! the run lock and drive the executor over the build order.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::cli::commands::{load_solution, resolve_solution};
use crate::cli::output::{self, print_info, print_warning, ProgressObserver};
use crate::core::builder::BuildExecutor;
use crate::core::settings::{BuildConfig, Settings, Variant};
use crate::infra::dirs::SolbuildDirs;
use crate::infra::filesystem;
use crate::infra::lock::RunLock;
use crate::infra::toolchain::ProcessToolchain;

/// Build options
#[derive(Debug, Default)]
pub struct BuildOptions {
    /// Solution to build
    pub solution: Option<PathBuf>,
    /// Variant overriding the configured one
    pub variant: Option<Variant>,
    /// Stop at the first failure in acyclic solutions
    pub stop_on_error: bool,
    /// Additional critical projects
    pub critical: Vec<String>,
    /// Explicit settings file
    pub config: Option<PathBuf>,
    /// Logs directory overriding the configured one
    pub logs: Option<PathBuf>,
}

impl BuildOptions {
    /// Apply command-line overrides on top of resolved settings
    pub fn apply(self, config: &mut BuildConfig) {
        if let Some(variant) = self.variant {
            config.variant = variant;
        }
        config.stop_on_error |= self.stop_on_error;
        config.critical.extend(self.critical);
        if let Some(logs) = self.logs {
            // Keep a configured failed dir, otherwise follow the logs dir
            if let Ok(rest) = config.failed_dir.strip_prefix(&config.logs_dir) {
                config.failed_dir = logs.join(rest);
            }
            config.logs_dir = logs;
        }
    }
}

/// Execute the build command
pub fn execute(mut options: BuildOptions) -> Result<i32> {
    let solution_path = resolve_solution(options.solution.take())?;
    let loaded = load_solution(&solution_path)?;
    let solution_dir = loaded.solution.directory().to_path_buf();

    let dirs = SolbuildDirs::new();
    let settings = Settings::load_layered(&dirs, &solution_dir, options.config.as_deref())
        .context("Failed to load settings")?;
    let mut config = settings.resolve(&solution_dir);
    if let Some(logs) = options.logs.take() {
        options.logs = Some(
            filesystem::absolute(&logs)
                .with_context(|| format!("Failed to resolve {}", logs.display()))?,
        );
    }
    options.apply(&mut config);

    for skipped in loaded.graph.skipped() {
        print_warning(&format!("Skipping {}: {}", skipped.name, skipped.reason));
    }
    for name in config.critical.iter().filter(|n| !loaded.graph.contains(n)) {
        tracing::warn!("Critical project {name} is not in the solution");
    }

    let toolchain = ProcessToolchain::from_config(&config.tools, config.variant)?;

    let _lock = RunLock::acquire(&dirs.run_lock_path())?;

    print_info(&format!(
        "Building {} projects ({}) from {}",
        loaded.sequence.order.len(),
        config.variant,
        solution_path.display()
    ));

    let mut executor =
        BuildExecutor::new(config, toolchain).with_observer(Box::new(ProgressObserver::new()));
    let report = executor
        .run(&loaded.graph, &loaded.sequence)
        .context("Build run could not start")?;

    output::print_run_report(&report);
    Ok(report.exit_code())
}
