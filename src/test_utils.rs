//! Test utilities
//!
//! Graph builders, proptest generators and a scripted toolchain for
//! exercising the executor without external processes.

use std::collections::{HashMap, HashSet};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::core::graph::DependencyGraph;
use crate::core::project::{OutputKind, Project, ProjectReference};
use crate::core::settings::{BuildConfig, Settings, Variant};
use crate::error::BuildError;
use crate::infra::filesystem;
use crate::infra::toolchain::{ToolOutcome, ToolRequest, Toolchain};

fn project_with_deps(name: &str, deps: &[String]) -> Project {
    Project {
        name: name.to_string(),
        // Identifier doubles as the name so references resolve directly
        identifier: name.to_string(),
        path: PathBuf::from(format!("{name}/{name}.xsproj")),
        output_kind: OutputKind::Library,
        references: deps
            .iter()
            .map(|d| ProjectReference {
                identifier: d.clone(),
                name: d.clone(),
                path: format!("../{d}/{d}.xsproj"),
            })
            .collect(),
    }
}

/// Build a graph from `(name, dependencies)` pairs
pub fn graph_of(edges: &[(&str, &[&str])]) -> DependencyGraph {
    let owned: Vec<(String, Vec<String>)> = edges
        .iter()
        .map(|(name, deps)| {
            (
                (*name).to_string(),
                deps.iter().map(|d| (*d).to_string()).collect(),
            )
        })
        .collect();
    graph_from_edges(&owned)
}

/// Build a graph from owned `(name, dependencies)` pairs
pub fn graph_from_edges(edges: &[(String, Vec<String>)]) -> DependencyGraph {
    DependencyGraph::from_projects(
        edges
            .iter()
            .map(|(name, deps)| project_with_deps(name, deps))
            .collect(),
    )
}

/// Release or Debug config writing logs under `dir/logs`
pub fn build_config(dir: &Path, variant: Variant) -> BuildConfig {
    let mut config = Settings::default().resolve(dir);
    config.variant = variant;
    config.logs_dir = dir.join("logs");
    config.failed_dir = dir.join("logs").join("failed");
    config
}

/// Which tool a scripted call went to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolKind {
    Generate,
    Compile,
}

/// Toolchain returning scripted exit codes and recording every call
#[derive(Debug, Default)]
pub struct ScriptedToolchain {
    compile_failures: HashMap<(String, Variant), usize>,
    generate_failures: HashSet<String>,
    launch_errors: HashSet<String>,
    calls: Vec<(ToolKind, String, Variant)>,
}

impl ScriptedToolchain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the first `times` compiles of `name` as `variant`
    #[must_use]
    pub fn fail_compile(mut self, name: &str, variant: Variant, times: usize) -> Self {
        self.compile_failures
            .insert((name.to_string(), variant), times);
        self
    }

    /// Fail every generation of `name`
    #[must_use]
    pub fn fail_generate(mut self, name: &str) -> Self {
        self.generate_failures.insert(name.to_string());
        self
    }

    /// Make every compile of `name` fail to launch
    #[must_use]
    pub fn launch_error(mut self, name: &str) -> Self {
        self.launch_errors.insert(name.to_string());
        self
    }

    /// Projects compiled, in call order
    pub fn compiled_names(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter(|(kind, _, _)| *kind == ToolKind::Compile)
            .map(|(_, name, _)| name.as_str())
            .collect()
    }

    /// Number of calls of `kind` for `name`
    pub fn count(&self, kind: ToolKind, name: &str) -> usize {
        self.calls
            .iter()
            .filter(|(k, n, _)| *k == kind && n == name)
            .count()
    }

    /// Calls made for `name`
    pub fn calls_for(&self, name: &str) -> Vec<(ToolKind, Variant)> {
        self.calls
            .iter()
            .filter(|(_, n, _)| n == name)
            .map(|(kind, _, variant)| (*kind, *variant))
            .collect()
    }

    fn record(
        &mut self,
        kind: ToolKind,
        request: &ToolRequest<'_>,
        exit_code: i32,
    ) -> Result<ToolOutcome, BuildError> {
        let name = request.project.name.clone();
        self.calls.push((kind, name.clone(), request.variant));

        let mut log = filesystem::open_log(request.log_path, kind == ToolKind::Generate)?;
        writeln!(log, "{kind:?} {name} {} exit {exit_code}", request.variant).map_err(|e| {
            BuildError::Log {
                path: request.log_path.to_path_buf(),
                error: e.to_string(),
            }
        })?;
        Ok(ToolOutcome::exited(exit_code))
    }
}

impl Toolchain for ScriptedToolchain {
    fn generate(&mut self, request: &ToolRequest<'_>) -> Result<ToolOutcome, BuildError> {
        let code = i32::from(self.generate_failures.contains(&request.project.name));
        self.record(ToolKind::Generate, request, code)
    }

    fn compile(&mut self, request: &ToolRequest<'_>) -> Result<ToolOutcome, BuildError> {
        if self.launch_errors.contains(&request.project.name) {
            self.calls
                .push((ToolKind::Compile, request.project.name.clone(), request.variant));
            return Err(BuildError::ToolLaunch {
                tool: "compiler".to_string(),
                program: PathBuf::from("scripted"),
                error: "launch refused".to_string(),
            });
        }

        let key = (request.project.name.clone(), request.variant);
        let code = match self.compile_failures.get_mut(&key) {
            Some(remaining) if *remaining > 0 => {
                *remaining -= 1;
                1
            }
            _ => 0,
        };
        self.record(ToolKind::Compile, request, code)
    }
}

pub mod generators {
    use proptest::prelude::*;

    fn names(count: usize) -> Vec<String> {
        (0..count).map(|i| format!("p{i:02}")).collect()
    }

    /// Graph with arbitrary edges, cycles and self references included
    pub fn any_graph() -> impl Strategy<Value = Vec<(String, Vec<String>)>> {
        (1usize..12).prop_flat_map(|count| {
            proptest::collection::vec(proptest::collection::vec(0..count, 0..4), count).prop_map(
                move |adjacency| {
                    let names = names(count);
                    adjacency
                        .into_iter()
                        .enumerate()
                        .map(|(i, deps)| {
                            (
                                names[i].clone(),
                                deps.into_iter().map(|d| names[d].clone()).collect(),
                            )
                        })
                        .collect()
                },
            )
        })
    }

    /// Graph whose edges only point at lower-indexed nodes
    pub fn acyclic_graph() -> impl Strategy<Value = Vec<(String, Vec<String>)>> {
        any_graph().prop_map(|edges| {
            edges
                .into_iter()
                .enumerate()
                .map(|(i, (name, deps))| {
                    let deps = deps
                        .into_iter()
                        .filter(|d| d[1..].parse::<usize>().is_ok_and(|j| j < i))
                        .collect();
                    (name, deps)
                })
                .collect()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::generators::*;
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_graph_of_resolves_edges() {
        let graph = graph_of(&[("app", &["lib"]), ("lib", &[])]);
        assert_eq!(graph.dependencies("app"), ["lib".to_string()]);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn test_acyclic_generator_points_backwards(edges in acyclic_graph()) {
            for (i, (_, deps)) in edges.iter().enumerate() {
                for dep in deps {
                    let j: usize = dep[1..].parse().unwrap();
                    prop_assert!(j < i);
                }
            }
        }
    }
}
