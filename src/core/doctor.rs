//! Doctor command logic
//!
//! Checks that the configured tools can be found and that the solution
//! loads cleanly, reporting issues with suggestions.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::core::graph::DependencyGraph;
use crate::core::resolver::Sequence;
use crate::core::settings::{BuildConfig, Variant};

/// Result of a single check
#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    /// Name of the thing being checked
    pub name: String,
    /// Whether the check passed
    pub passed: bool,
    /// Resolved location if available
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<PathBuf>,
    /// Error message if check failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Suggestion for fixing the issue
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    /// Whether a build cannot run without it
    pub required: bool,
}

impl CheckResult {
    /// Create a passing check result
    pub fn pass(name: &str, location: Option<PathBuf>, required: bool) -> Self {
        Self {
            name: name.to_string(),
            passed: true,
            location,
            error: None,
            suggestion: None,
            required,
        }
    }

    /// Create a failing check result
    pub fn fail(name: &str, error: &str, suggestion: Option<&str>, required: bool) -> Self {
        Self {
            name: name.to_string(),
            passed: false,
            location: None,
            error: Some(error.to_string()),
            suggestion: suggestion.map(String::from),
            required,
        }
    }
}

/// Overall doctor report
#[derive(Debug, Default, Serialize)]
pub struct DoctorReport {
    /// Individual check results
    pub checks: Vec<CheckResult>,
    /// Solution problems found
    pub solution_issues: Vec<String>,
}

impl DoctorReport {
    /// Create a new empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a check result
    pub fn add_check(&mut self, result: CheckResult) {
        self.checks.push(result);
    }

    /// Add a solution issue
    pub fn add_solution_issue(&mut self, issue: String) {
        self.solution_issues.push(issue);
    }

    /// Check if all required checks passed
    pub fn all_required_passed(&self) -> bool {
        self.checks.iter().filter(|c| c.required).all(|c| c.passed)
    }

    /// Check if everything passed, including optional checks
    pub fn all_passed(&self) -> bool {
        self.checks.iter().all(|c| c.passed) && self.solution_issues.is_empty()
    }

    /// Count passed checks
    pub fn passed_count(&self) -> usize {
        self.checks.iter().filter(|c| c.passed).count()
    }

    /// Count failed checks
    pub fn failed_count(&self) -> usize {
        self.checks.iter().filter(|c| !c.passed).count()
    }

    /// Get all failed required checks
    pub fn failed_required(&self) -> Vec<&CheckResult> {
        self.checks
            .iter()
            .filter(|c| c.required && !c.passed)
            .collect()
    }
}

/// Locate a program given as a bare name or a path
///
/// Bare names are searched in `PATH`, then in `bin_dir`.
pub fn locate_program(program: &Path, bin_dir: &Path) -> Option<PathBuf> {
    if program.components().count() > 1 || program.is_absolute() {
        return program.is_file().then(|| program.to_path_buf());
    }
    which::which(program).ok().or_else(|| {
        let candidate = bin_dir.join(program);
        candidate.is_file().then_some(candidate)
    })
}

fn check_tool(name: &str, program: Option<&Path>, bin_dir: &Path, required: bool) -> CheckResult {
    let key = name.to_lowercase();
    let Some(program) = program else {
        return CheckResult::fail(
            name,
            &format!("No {key} configured"),
            Some(&format!("Set tools.{key} in solbuild.toml")),
            required,
        );
    };

    match locate_program(program, bin_dir) {
        Some(path) => CheckResult::pass(name, Some(path), required),
        None => CheckResult::fail(
            name,
            &format!("{} not found", program.display()),
            Some(&format!(
                "Install it, add it to PATH or point tools.{key} at the executable"
            )),
            required,
        ),
    }
}

fn check_directory(name: &str, path: &Path) -> CheckResult {
    if path.is_dir() {
        CheckResult::pass(name, Some(path.to_path_buf()), false)
    } else {
        CheckResult::fail(
            name,
            &format!("{} does not exist", path.display()),
            Some("Tools are passed this directory; create it or fix the setting"),
            false,
        )
    }
}

/// Check the configured tools and directories
pub fn check_tools(config: &BuildConfig) -> Vec<CheckResult> {
    let tools = &config.tools;
    vec![
        check_tool("Compiler", tools.compiler.as_deref(), &tools.bin_dir, true),
        check_tool(
            "Generator",
            tools.generator.as_deref(),
            &tools.bin_dir,
            config.variant == Variant::Debug,
        ),
        check_directory("Tool binaries directory", &tools.bin_dir),
        check_directory("Tool configuration directory", &tools.config_dir),
    ]
}

/// Describe problems in a loaded solution
pub fn check_solution(
    graph: &DependencyGraph,
    sequence: &Sequence,
    config: &BuildConfig,
) -> Vec<String> {
    let mut issues: Vec<String> = graph
        .skipped()
        .iter()
        .map(|s| format!("Skipped {}: {}", s.name, s.reason))
        .collect();

    issues.extend(sequence.cycles.iter().map(|cycle| {
        format!(
            "Circular dependency: {} -> {}",
            cycle.join(" -> "),
            cycle[0]
        )
    }));

    issues.extend(
        config
            .critical
            .iter()
            .filter(|name| !graph.contains(name))
            .map(|name| format!("Critical project {name} is not in the solution")),
    );

    issues
}

/// Run all doctor checks
pub fn run_doctor(config: &BuildConfig, solution: Option<(&DependencyGraph, &Sequence)>) -> DoctorReport {
    let mut report = DoctorReport::new();

    for check in check_tools(config) {
        report.add_check(check);
    }

    if let Some((graph, sequence)) = solution {
        for issue in check_solution(graph, sequence, config) {
            report.add_solution_issue(issue);
        }
    }

    report
}
