//! Output formatting and progress indicators
//!
//! This module provides utilities for displaying progress bars,
//! status-prefixed messages and build summaries to the user.

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use indicatif::{ProgressBar, ProgressStyle};

use crate::core::builder::{AttemptStatus, BuildObserver, PassReport, RunReport};

static QUIET: AtomicBool = AtomicBool::new(false);
static JSON: AtomicBool = AtomicBool::new(false);
static VERBOSITY: AtomicU8 = AtomicU8::new(0);

/// Output settings taken from global flags
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputConfig {
    /// Only errors are printed
    pub quiet: bool,
    /// Machine-readable output on stdout
    pub json: bool,
    /// Verbosity level from `-v` flags
    pub verbose: u8,
}

impl OutputConfig {
    /// Create an output configuration
    pub fn new(quiet: bool, json: bool, verbose: u8) -> Self {
        Self {
            quiet,
            json,
            verbose,
        }
    }

    /// Make this configuration visible to every output helper
    pub fn apply_global(self) {
        QUIET.store(self.quiet, Ordering::Relaxed);
        JSON.store(self.json, Ordering::Relaxed);
        VERBOSITY.store(self.verbose, Ordering::Relaxed);
    }
}

/// Whether quiet mode is active
pub fn is_quiet() -> bool {
    QUIET.load(Ordering::Relaxed)
}

/// Whether JSON output is active
pub fn is_json() -> bool {
    JSON.load(Ordering::Relaxed)
}

/// Current verbosity level
pub fn verbosity() -> u8 {
    VERBOSITY.load(Ordering::Relaxed)
}

fn show_human() -> bool {
    !is_quiet() && !is_json()
}

/// Print an informational message
pub fn print_info(message: &str) {
    if show_human() {
        println!("{} {message}", status::INFO);
    }
}

/// Print a success message
pub fn print_success(message: &str) {
    if show_human() {
        println!("{} {message}", status::SUCCESS);
    }
}

/// Print a warning message
pub fn print_warning(message: &str) {
    if show_human() {
        println!("{} {message}", status::WARNING);
    }
}

/// Print an indented detail line
pub fn print_detail(message: &str) {
    if show_human() {
        println!("  {message}");
    }
}

/// Print an error with its cause chain to stderr
pub fn display_error(error: &anyhow::Error) {
    if is_json() {
        let json = serde_json::json!({
            "status": "error",
            "message": error.to_string(),
            "causes": error.chain().skip(1).map(ToString::to_string).collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&json).unwrap_or_default());
        return;
    }

    eprintln!("{} Error: {error}", status::ERROR);
    for cause in error.chain().skip(1) {
        eprintln!("  Caused by: {cause}");
    }
}

/// Create a progress bar for a build pass
pub fn create_build_bar(total: u64) -> ProgressBar {
    if !show_human() {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} projects ({msg})")
            .expect("Invalid progress bar template")
            .progress_chars("█▓▒░"),
    );
    pb
}

/// Drives a progress bar from build executor events
#[derive(Debug, Default)]
pub struct ProgressObserver {
    bar: Option<ProgressBar>,
}

impl ProgressObserver {
    /// Create an observer with no active bar
    pub fn new() -> Self {
        Self::default()
    }
}

impl BuildObserver for ProgressObserver {
    fn pass_started(&mut self, pass: u32, total_passes: u32, projects: usize) {
        if total_passes > 1 {
            print_info(&format!("Pass {pass}/{total_passes}"));
        }
        self.bar = Some(create_build_bar(projects as u64));
    }

    fn project_started(&mut self, name: &str) {
        if let Some(bar) = &self.bar {
            bar.set_message(name.to_string());
        }
    }

    fn project_finished(&mut self, name: &str, status: AttemptStatus) {
        let Some(bar) = &self.bar else {
            return;
        };
        match status {
            AttemptStatus::FailedFinal => bar.println(format!("{} {name}: {status}", status::ERROR)),
            AttemptStatus::FailedRetrying | AttemptStatus::Succeeded { via_fallback: true } => {
                bar.println(format!("{} {name}: {status}", status::WARNING));
            }
            _ if verbosity() > 0 => bar.println(format!("{} {name}: {status}", status::SUCCESS)),
            _ => {}
        }
        bar.inc(1);
    }

    fn pass_finished(&mut self, _report: &PassReport) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}

/// Print the summary of a finished build run
pub fn print_run_report(report: &RunReport) {
    if is_json() {
        println!("{}", serde_json::to_string_pretty(report).unwrap_or_default());
        return;
    }

    for cycle in &report.cycles {
        print_warning(&format!(
            "Circular dependency: {} -> {}",
            cycle.join(" -> "),
            cycle[0]
        ));
    }

    for pass in &report.passes {
        print_detail(&format!(
            "Pass {}: {} succeeded, {} failed, {} skipped",
            pass.pass,
            pass.succeeded_count(),
            pass.failed_count(),
            pass.skipped_count()
        ));
        if let Some(reason) = &pass.aborted {
            print_warning(&format!("Pass {} aborted: {reason}", pass.pass));
        }
        if !pass.not_attempted.is_empty() {
            print_detail(&format!("Not attempted: {}", pass.not_attempted.join(", ")));
        }
    }

    if report.is_success() {
        print_success(&format!("{} build succeeded", report.variant));
        return;
    }

    // Failures are shown even in quiet mode
    eprintln!(
        "{} {} build failed ({} project(s))",
        status::ERROR,
        report.variant,
        report.failed.len()
    );
    for failed in &report.failed {
        match &failed.log {
            Some(log) => eprintln!("  • {} (log: {})", failed.name, log.display()),
            None => eprintln!("  • {}", failed.name),
        }
    }
}

/// Status message prefixes
pub mod status {
    /// Success prefix (green checkmark)
    pub const SUCCESS: &str = "✓";

    /// Error prefix (red X)
    pub const ERROR: &str = "✗";

    /// Warning prefix (yellow triangle)
    pub const WARNING: &str = "⚠";

    /// Info prefix (blue circle)
    pub const INFO: &str = "ℹ";
}
