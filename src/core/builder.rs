//! Build orchestration logic
//!
//! Walks the build order and compiles one project at a time. A graph with
//! cycles gets a second pass in which projects that failed in the first
//! pass are retried; projects that already succeeded are skipped. On the
//! last pass a failed Debug build is regenerated and compiled as Release
//! before the project is given up on.

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::defaults;
use crate::core::graph::DependencyGraph;
use crate::core::project::Project;
use crate::core::resolver::{CycleRecord, Sequence};
use crate::core::settings::{BuildConfig, Variant};
use crate::error::BuildError;
use crate::infra::filesystem;
use crate::infra::toolchain::{ToolRequest, Toolchain};

/// Result of one project in one pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptStatus {
    /// Built; `via_fallback` when only the Release fallback worked
    Succeeded { via_fallback: bool },
    /// Failed, will be retried in the next pass
    FailedRetrying,
    /// Failed with no retry left
    FailedFinal,
    /// Already built in an earlier pass
    Skipped,
}

impl AttemptStatus {
    /// Whether the project was built
    pub fn is_success(self) -> bool {
        matches!(self, Self::Succeeded { .. })
    }

    /// Whether the attempt counts as a failure of the pass
    pub fn is_failure(self) -> bool {
        matches!(self, Self::FailedRetrying | Self::FailedFinal)
    }
}

impl fmt::Display for AttemptStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Succeeded {
                via_fallback: false,
            } => write!(f, "succeeded"),
            Self::Succeeded { via_fallback: true } => write!(f, "succeeded (release fallback)"),
            Self::FailedRetrying => write!(f, "failed, retrying"),
            Self::FailedFinal => write!(f, "failed"),
            Self::Skipped => write!(f, "skipped"),
        }
    }
}

/// One project's entry in a pass report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectAttempt {
    /// Project name
    pub name: String,
    /// Outcome
    pub status: AttemptStatus,
    /// Log of the last tool run, if any ran
    pub log: Option<PathBuf>,
}

/// Why a pass stopped early
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "reason", content = "project")]
pub enum AbortReason {
    /// A critical project failed
    CriticalFailure(String),
    /// Stop-on-error was set and a project failed
    StopOnError(String),
}

impl fmt::Display for AbortReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CriticalFailure(name) => write!(f, "critical project {name} failed"),
            Self::StopOnError(name) => write!(f, "{name} failed and stop-on-error is set"),
        }
    }
}

/// Summary of one pass over the build order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PassReport {
    /// Pass number, starting at 1
    pub pass: u32,
    /// Attempts in build order
    pub attempts: Vec<ProjectAttempt>,
    /// Set if the pass stopped early
    pub aborted: Option<AbortReason>,
    /// Projects not reached because the pass stopped early
    pub not_attempted: Vec<String>,
}

impl PassReport {
    fn new(pass: u32) -> Self {
        Self {
            pass,
            attempts: Vec::new(),
            aborted: None,
            not_attempted: Vec::new(),
        }
    }

    fn count(&self, pred: impl Fn(AttemptStatus) -> bool) -> usize {
        self.attempts.iter().filter(|a| pred(a.status)).count()
    }

    /// Projects built in this pass
    pub fn succeeded_count(&self) -> usize {
        self.count(AttemptStatus::is_success)
    }

    /// Projects that failed in this pass
    pub fn failed_count(&self) -> usize {
        self.count(AttemptStatus::is_failure)
    }

    /// Projects skipped in this pass
    pub fn skipped_count(&self) -> usize {
        self.count(|s| s == AttemptStatus::Skipped)
    }

    /// Names of projects that failed in this pass
    pub fn failed_names(&self) -> Vec<&str> {
        self.attempts
            .iter()
            .filter(|a| a.status.is_failure())
            .map(|a| a.name.as_str())
            .collect()
    }

    /// Whether the pass finished with zero failures
    pub fn is_clean(&self) -> bool {
        self.failed_count() == 0 && self.aborted.is_none()
    }
}

/// Overall run result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunOutcome {
    /// Some pass finished with zero failures
    Succeeded,
    /// No pass finished cleanly
    Failed,
}

/// A project that never built, with a pointer to its log
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedProject {
    /// Project name
    pub name: String,
    /// Log describing the failure
    pub log: Option<PathBuf>,
}

/// Report of a complete build run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Overall result
    pub outcome: RunOutcome,
    /// Configured variant
    pub variant: Variant,
    /// Per-pass summaries
    pub passes: Vec<PassReport>,
    /// Projects that ended the run failed
    pub failed: Vec<FailedProject>,
    /// Cycles that caused a second pass
    pub cycles: Vec<CycleRecord>,
}

impl RunReport {
    /// Whether the run succeeded
    pub fn is_success(&self) -> bool {
        self.outcome == RunOutcome::Succeeded
    }

    /// Process exit code for the run
    pub fn exit_code(&self) -> i32 {
        i32::from(!self.is_success())
    }

    /// Names of the failed projects
    pub fn failed_names(&self) -> Vec<&str> {
        self.failed.iter().map(|f| f.name.as_str()).collect()
    }

    /// Last non-skipped status of a project across passes
    pub fn final_status(&self, name: &str) -> Option<AttemptStatus> {
        self.passes
            .iter()
            .rev()
            .flat_map(|p| p.attempts.iter())
            .find(|a| a.name == name && a.status != AttemptStatus::Skipped)
            .map(|a| a.status)
    }
}

/// Hooks for following a build run
pub trait BuildObserver {
    /// A pass is starting
    fn pass_started(&mut self, _pass: u32, _total_passes: u32, _projects: usize) {}

    /// A project is about to be compiled
    fn project_started(&mut self, _name: &str) {}

    /// A project's attempt finished (including skips)
    fn project_finished(&mut self, _name: &str, _status: AttemptStatus) {}

    /// A pass finished
    fn pass_finished(&mut self, _report: &PassReport) {}
}

/// Observer that ignores everything
#[derive(Debug, Default)]
pub struct NoopObserver;

impl BuildObserver for NoopObserver {}

#[derive(Debug, Clone, Copy)]
enum Step {
    Generate,
    Compile,
}

impl Step {
    fn label(self) -> &'static str {
        match self {
            Self::Generate => "generate",
            Self::Compile => "compile",
        }
    }
}

/// Executes builds in sequence order
pub struct BuildExecutor<T: Toolchain> {
    config: BuildConfig,
    toolchain: T,
    observer: Box<dyn BuildObserver>,
}

impl<T: Toolchain> BuildExecutor<T> {
    /// Create an executor for `config` using `toolchain`
    pub fn new(config: BuildConfig, toolchain: T) -> Self {
        Self {
            config,
            toolchain,
            observer: Box::new(NoopObserver),
        }
    }

    /// Attach an observer
    #[must_use]
    pub fn with_observer(mut self, observer: Box<dyn BuildObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Consume the executor, returning the toolchain
    pub fn into_toolchain(self) -> T {
        self.toolchain
    }

    /// Build every project in `sequence`
    ///
    /// Project failures are part of the report; only failing to prepare the
    /// logs directory is an error.
    pub fn run(
        &mut self,
        graph: &DependencyGraph,
        sequence: &Sequence,
    ) -> Result<RunReport, BuildError> {
        filesystem::create_dir_all(&self.config.logs_dir)?;

        let cyclic = sequence.has_circular_dependencies();
        let total_passes = if cyclic {
            defaults::CYCLIC_PASSES
        } else {
            defaults::ACYCLIC_PASSES
        };

        let mut built: HashSet<String> = HashSet::new();
        let mut passes: Vec<PassReport> = Vec::new();
        let mut outcome = RunOutcome::Failed;

        for pass in 1..=total_passes {
            let report = self.run_pass(graph, sequence, pass, total_passes, &mut built);
            let clean = report.is_clean();
            let aborted = report.aborted.is_some();

            tracing::info!(
                "Pass {pass}/{total_passes}: {} succeeded, {} failed, {} skipped",
                report.succeeded_count(),
                report.failed_count(),
                report.skipped_count()
            );
            self.observer.pass_finished(&report);
            passes.push(report);

            if clean {
                outcome = RunOutcome::Succeeded;
                break;
            }
            if aborted {
                break;
            }
        }

        let failed = failed_projects(&sequence.order, &passes, &built);

        Ok(RunReport {
            outcome,
            variant: self.config.variant,
            passes,
            failed,
            cycles: sequence.cycles.clone(),
        })
    }

    fn run_pass(
        &mut self,
        graph: &DependencyGraph,
        sequence: &Sequence,
        pass: u32,
        total_passes: u32,
        built: &mut HashSet<String>,
    ) -> PassReport {
        let cyclic = total_passes > 1;
        let final_pass = pass == total_passes;
        let mut report = PassReport::new(pass);

        tracing::info!(
            "Starting pass {pass}/{total_passes} over {} projects",
            sequence.order.len()
        );
        self.observer
            .pass_started(pass, total_passes, sequence.order.len());

        for (index, name) in sequence.order.iter().enumerate() {
            if built.contains(name) {
                report.attempts.push(ProjectAttempt {
                    name: name.clone(),
                    status: AttemptStatus::Skipped,
                    log: None,
                });
                self.observer.project_finished(name, AttemptStatus::Skipped);
                continue;
            }
            let Some(node) = graph.get(name) else {
                tracing::warn!("{name} is in the build order but not in the graph");
                continue;
            };

            self.observer.project_started(name);
            let (status, log) = self.build_project(&node.project, pass, cyclic && !final_pass);
            self.observer.project_finished(name, status);

            report.attempts.push(ProjectAttempt {
                name: name.clone(),
                status,
                log: Some(log.clone()),
            });

            match status {
                AttemptStatus::Succeeded { .. } => {
                    built.insert(name.clone());
                }
                AttemptStatus::FailedFinal => {
                    tracing::error!("{name} failed, see {}", log.display());
                    self.collect_failed_log(name, &log);

                    let abort = if self.config.is_critical(name) {
                        tracing::error!("Critical project {name} failed; stopping pass {pass}");
                        Some(AbortReason::CriticalFailure(name.clone()))
                    } else if self.config.stop_on_error && !cyclic {
                        tracing::info!("Stopping pass {pass} after {name} failed");
                        Some(AbortReason::StopOnError(name.clone()))
                    } else {
                        None
                    };

                    if let Some(reason) = abort {
                        report.aborted = Some(reason);
                        report.not_attempted = sequence.order[index + 1..].to_vec();
                        break;
                    }
                }
                AttemptStatus::FailedRetrying | AttemptStatus::Skipped => {}
            }
        }

        report
    }

    fn build_project(
        &mut self,
        project: &Project,
        pass: u32,
        retry_allowed: bool,
    ) -> (AttemptStatus, PathBuf) {
        let name = &project.name;
        let variant = self.config.variant;
        let log = self.compile_log(name, pass);

        tracing::info!("Building {name} ({variant}, pass {pass})");
        if self.invoke(Step::Compile, project, variant, &log) {
            return (
                AttemptStatus::Succeeded {
                    via_fallback: false,
                },
                log,
            );
        }

        if retry_allowed {
            tracing::info!("{name} did not build in pass {pass}; retrying next pass");
            return (AttemptStatus::FailedRetrying, log);
        }

        if variant == Variant::Debug {
            return self.release_fallback(project, pass, log);
        }

        (AttemptStatus::FailedFinal, log)
    }

    /// Regenerate and compile a failed Debug project as Release
    fn release_fallback(
        &mut self,
        project: &Project,
        pass: u32,
        log: PathBuf,
    ) -> (AttemptStatus, PathBuf) {
        let name = &project.name;
        let debug_log = self.logs_path(&format!("{name}_pass{pass}_debug.log"));
        match filesystem::preserve_log(&log, &debug_log) {
            Ok(true) => {}
            Ok(false) => tracing::debug!("{name} left no Debug log to keep"),
            Err(e) => tracing::warn!("Could not keep Debug log of {name}: {e}"),
        }

        tracing::warn!(
            "{name} failed as Debug (log: {}); falling back to Release",
            debug_log.display()
        );

        let generate_log = self.logs_path(&format!("{name}_generate.log"));
        if !self.invoke(Step::Generate, project, Variant::Release, &generate_log) {
            return (AttemptStatus::FailedFinal, generate_log);
        }

        if self.invoke(Step::Compile, project, Variant::Release, &log) {
            tracing::info!("{name} built with the Release fallback");
            (AttemptStatus::Succeeded { via_fallback: true }, log)
        } else {
            (AttemptStatus::FailedFinal, log)
        }
    }

    fn invoke(&mut self, step: Step, project: &Project, variant: Variant, log: &Path) -> bool {
        let request = ToolRequest {
            project,
            variant,
            bin_dir: &self.config.tools.bin_dir,
            config_dir: &self.config.tools.config_dir,
            log_path: log,
        };

        let result = match step {
            Step::Generate => self.toolchain.generate(&request),
            Step::Compile => self.toolchain.compile(&request),
        };

        match result {
            Ok(outcome) if outcome.success() => true,
            Ok(outcome) => {
                tracing::debug!(
                    "{} {} ({variant}) exited with {:?}",
                    step.label(),
                    project.name,
                    outcome.exit_code
                );
                false
            }
            Err(e) => {
                tracing::warn!("{} {} ({variant}): {e}", step.label(), project.name);
                false
            }
        }
    }

    fn collect_failed_log(&self, name: &str, log: &Path) {
        if !log.exists() {
            return;
        }
        if let Err(e) =
            filesystem::collect_log(log, &self.config.failed_dir, &format!("{name}.log"))
        {
            tracing::warn!("Could not copy failed log of {name}: {e}");
        }
    }

    fn compile_log(&self, name: &str, pass: u32) -> PathBuf {
        self.logs_path(&format!("{name}_pass{pass}.log"))
    }

    fn logs_path(&self, file_name: &str) -> PathBuf {
        self.config.logs_dir.join(file_name)
    }
}

/// Projects that failed in some pass and never built, in build order
///
/// Each carries the log of its most recent failure.
fn failed_projects(
    order: &[String],
    passes: &[PassReport],
    built: &HashSet<String>,
) -> Vec<FailedProject> {
    order
        .iter()
        .filter(|name| !built.contains(*name))
        .filter_map(|name| {
            passes
                .iter()
                .rev()
                .flat_map(|pass| pass.attempts.iter())
                .find(|a| &a.name == name && a.status.is_failure())
                .map(|a| FailedProject {
                    name: a.name.clone(),
                    log: a.log.clone(),
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::resolver::sequence;
    use crate::test_utils::{build_config, graph_of, ScriptedToolchain, ToolKind};
    use tempfile::TempDir;

    fn run(
        config: BuildConfig,
        toolchain: ScriptedToolchain,
        graph: &DependencyGraph,
    ) -> (RunReport, ScriptedToolchain) {
        let order = sequence(graph);
        let mut executor = BuildExecutor::new(config, toolchain);
        let report = executor.run(graph, &order).unwrap();
        (report, executor.toolchain)
    }

    #[test]
    fn test_all_succeed_in_one_pass() {
        let dir = TempDir::new().unwrap();
        let graph = graph_of(&[("app", &["lib"]), ("lib", &[])]);

        let (report, tools) = run(
            build_config(dir.path(), Variant::Release),
            ScriptedToolchain::new(),
            &graph,
        );

        assert!(report.is_success());
        assert_eq!(report.exit_code(), 0);
        assert_eq!(report.passes.len(), 1);
        assert_eq!(tools.compiled_names(), vec!["lib", "app"]);
        assert!(dir.path().join("logs/lib_pass1.log").exists());
    }

    #[test]
    fn test_release_failure_is_final() {
        let dir = TempDir::new().unwrap();
        let graph = graph_of(&[("app", &["lib"]), ("lib", &[])]);
        let tools = ScriptedToolchain::new().fail_compile("lib", Variant::Release, 1);

        let (report, tools) = run(build_config(dir.path(), Variant::Release), tools, &graph);

        assert!(!report.is_success());
        assert_eq!(report.exit_code(), 1);
        assert_eq!(report.failed_names(), vec!["lib"]);
        assert_eq!(report.final_status("app"), Some(AttemptStatus::Succeeded { via_fallback: false }));
        assert_eq!(tools.count(ToolKind::Generate, "lib"), 0);
        assert!(dir.path().join("logs/failed/lib.log").exists());
    }

    #[test]
    fn test_debug_failure_falls_back_to_release() {
        let dir = TempDir::new().unwrap();
        let graph = graph_of(&[("lib", &[])]);
        let tools = ScriptedToolchain::new().fail_compile("lib", Variant::Debug, 1);

        let (report, tools) = run(build_config(dir.path(), Variant::Debug), tools, &graph);

        assert!(report.is_success());
        assert_eq!(
            report.final_status("lib"),
            Some(AttemptStatus::Succeeded { via_fallback: true })
        );
        assert_eq!(
            tools.calls_for("lib"),
            vec![
                (ToolKind::Compile, Variant::Debug),
                (ToolKind::Generate, Variant::Release),
                (ToolKind::Compile, Variant::Release),
            ]
        );
        let logs = dir.path().join("logs");
        assert!(logs.join("lib_pass1_debug.log").exists());
        assert!(logs.join("lib_pass1.log").exists());
        assert!(logs.join("lib_generate.log").exists());
        assert!(!logs.join("failed").exists());
    }

    #[test]
    fn test_generate_failure_ends_fallback() {
        let dir = TempDir::new().unwrap();
        let graph = graph_of(&[("lib", &[])]);
        let tools = ScriptedToolchain::new()
            .fail_compile("lib", Variant::Debug, 1)
            .fail_generate("lib");

        let (report, tools) = run(build_config(dir.path(), Variant::Debug), tools, &graph);

        assert_eq!(report.final_status("lib"), Some(AttemptStatus::FailedFinal));
        assert_eq!(tools.count(ToolKind::Compile, "lib"), 1);
        assert_eq!(
            report.failed[0].log,
            Some(dir.path().join("logs/lib_generate.log"))
        );
    }

    #[test]
    fn test_critical_failure_stops_pass() {
        let dir = TempDir::new().unwrap();
        let graph = graph_of(&[
            ("reports", &["classes"]),
            ("classes", &["data"]),
            ("data", &[]),
        ]);
        let mut config = build_config(dir.path(), Variant::Release);
        config.critical = ["data".to_string(), "classes".to_string()].into();
        let tools = ScriptedToolchain::new().fail_compile("data", Variant::Release, 1);

        let (report, tools) = run(config, tools, &graph);

        assert!(!report.is_success());
        assert_eq!(report.failed_names(), vec!["data"]);
        assert_eq!(tools.compiled_names(), vec!["data"]);
        let pass = &report.passes[0];
        assert_eq!(pass.aborted, Some(AbortReason::CriticalFailure("data".to_string())));
        assert_eq!(pass.not_attempted, vec!["classes", "reports"]);
    }

    #[test]
    fn test_continue_on_error_collects_all_failures() {
        let dir = TempDir::new().unwrap();
        let graph = graph_of(&[("a", &[]), ("b", &[]), ("c", &[])]);
        let tools = ScriptedToolchain::new()
            .fail_compile("a", Variant::Release, 1)
            .fail_compile("c", Variant::Release, 1);

        let (report, _) = run(build_config(dir.path(), Variant::Release), tools, &graph);

        assert_eq!(report.failed_names(), vec!["a", "c"]);
        assert_eq!(report.passes[0].succeeded_count(), 1);
        assert_eq!(report.passes[0].failed_count(), 2);
    }

    #[test]
    fn test_stop_on_error_aborts_acyclic_pass() {
        let dir = TempDir::new().unwrap();
        let graph = graph_of(&[("a", &[]), ("b", &[]), ("c", &[])]);
        let mut config = build_config(dir.path(), Variant::Release);
        config.stop_on_error = true;
        let tools = ScriptedToolchain::new().fail_compile("a", Variant::Release, 1);

        let (report, tools) = run(config, tools, &graph);

        assert_eq!(tools.compiled_names(), vec!["a"]);
        assert_eq!(
            report.passes[0].aborted,
            Some(AbortReason::StopOnError("a".to_string()))
        );
    }

    #[test]
    fn test_cycle_gets_second_pass_and_skips_built() {
        let dir = TempDir::new().unwrap();
        let graph = graph_of(&[("a", &["b"]), ("b", &["a"]), ("c", &["a"])]);
        let tools = ScriptedToolchain::new().fail_compile("b", Variant::Debug, 1);

        let (report, tools) = run(build_config(dir.path(), Variant::Debug), tools, &graph);

        assert!(report.is_success());
        assert_eq!(report.passes.len(), 2);
        assert_eq!(report.passes[0].attempts[0].status, AttemptStatus::FailedRetrying);
        assert_eq!(report.passes[1].skipped_count(), 2);
        assert_eq!(tools.count(ToolKind::Compile, "a"), 1);
        assert_eq!(tools.count(ToolKind::Compile, "b"), 2);
        assert_eq!(tools.count(ToolKind::Generate, "b"), 0);
    }

    #[test]
    fn test_cycle_stop_on_error_is_ignored() {
        let dir = TempDir::new().unwrap();
        let graph = graph_of(&[("a", &["b"]), ("b", &["a"]), ("z", &[])]);
        let mut config = build_config(dir.path(), Variant::Release);
        config.stop_on_error = true;
        let tools = ScriptedToolchain::new().fail_compile("b", Variant::Release, 2);

        let (report, tools) = run(config, tools, &graph);

        assert!(!report.is_success());
        assert_eq!(report.passes.len(), 2);
        assert!(report.passes[1].aborted.is_none());
        assert_eq!(tools.count(ToolKind::Compile, "z"), 1);
        assert_eq!(report.failed_names(), vec!["b"]);
    }

    #[test]
    fn test_clean_first_pass_ends_cyclic_run() {
        let dir = TempDir::new().unwrap();
        let graph = graph_of(&[("a", &["b"]), ("b", &["a"])]);

        let (report, tools) = run(
            build_config(dir.path(), Variant::Debug),
            ScriptedToolchain::new(),
            &graph,
        );

        assert!(report.is_success());
        assert_eq!(report.passes.len(), 1);
        assert_eq!(report.cycles.len(), 1);
        assert_eq!(tools.compiled_names().len(), 2);
    }

    #[test]
    fn test_failure_from_earlier_pass_is_reported_after_abort() {
        let dir = TempDir::new().unwrap();
        let graph = graph_of(&[("crit", &[]), ("x", &["y"]), ("y", &["x"])]);
        let mut config = build_config(dir.path(), Variant::Release);
        config.critical = ["crit".to_string()].into();
        let tools = ScriptedToolchain::new()
            .fail_compile("crit", Variant::Release, 2)
            .fail_compile("y", Variant::Release, 2);

        let (report, tools) = run(config, tools, &graph);

        assert_eq!(report.passes.len(), 2);
        assert_eq!(
            report.passes[1].aborted,
            Some(AbortReason::CriticalFailure("crit".to_string()))
        );
        assert_eq!(tools.count(ToolKind::Compile, "y"), 1);
        assert_eq!(report.failed_names(), vec!["crit", "y"]);
        assert_eq!(report.failed[1].log, Some(dir.path().join("logs/y_pass1.log")));
        assert_eq!(
            report.final_status("x"),
            Some(AttemptStatus::Succeeded { via_fallback: false })
        );
    }

    #[test]
    fn test_launch_error_counts_as_failure() {
        let dir = TempDir::new().unwrap();
        let graph = graph_of(&[("lib", &[])]);
        let tools = ScriptedToolchain::new().launch_error("lib");

        let (report, _) = run(build_config(dir.path(), Variant::Release), tools, &graph);

        assert_eq!(report.failed_names(), vec!["lib"]);
    }

    #[test]
    fn test_observer_sees_every_project() {
        use std::cell::RefCell;
        use std::rc::Rc;

        struct Recorder(Rc<RefCell<Vec<String>>>);
        impl BuildObserver for Recorder {
            fn project_finished(&mut self, name: &str, status: AttemptStatus) {
                self.0.borrow_mut().push(format!("{name}:{status}"));
            }
        }

        let dir = TempDir::new().unwrap();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let graph = graph_of(&[("a", &[]), ("b", &[])]);
        let mut executor = BuildExecutor::new(
            build_config(dir.path(), Variant::Release),
            ScriptedToolchain::new(),
        )
        .with_observer(Box::new(Recorder(Rc::clone(&seen))));

        executor.run(&graph, &sequence(&graph)).unwrap();
        assert_eq!(*seen.borrow(), vec!["a:succeeded", "b:succeeded"]);
    }
}
