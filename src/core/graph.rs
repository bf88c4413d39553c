//! Dependency graph construction
//!
//! Combines parsed project descriptors into a graph keyed by project
//! name. References are resolved through the identifier→name mapping;
//! references to projects outside the solution are dropped.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::core::project::Project;
use crate::core::solution::SolutionEntry;

/// A project node with its resolved dependencies
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphNode {
    /// Parsed project metadata
    pub project: Project,
    /// Names of projects this one depends on (all present in the graph)
    pub dependencies: Vec<String>,
}

/// A project that could not be added to the graph
#[derive(Debug, Clone, Serialize)]
pub struct SkippedProject {
    /// Solution display name
    pub name: String,
    /// Why it was skipped
    pub reason: String,
}

/// Project dependency graph
///
/// Built once per run and read-only afterwards.
#[derive(Debug, Default)]
pub struct DependencyGraph {
    nodes: HashMap<String, GraphNode>,
    skipped: Vec<SkippedProject>,
}

impl DependencyGraph {
    /// Parse every solution entry and build the graph
    ///
    /// Entries whose descriptor fails to parse are logged and recorded as
    /// skipped; discovery of the remaining projects continues.
    pub fn from_entries(entries: &[SolutionEntry]) -> Self {
        let mut projects = Vec::with_capacity(entries.len());
        let mut skipped = Vec::new();

        for entry in entries {
            match Project::load(&entry.name, &entry.path) {
                Ok(project) => projects.push(project),
                Err(e) => {
                    tracing::warn!("Excluding project {} from the build: {e}", entry.name);
                    skipped.push(SkippedProject {
                        name: entry.name.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        let mut graph = Self::from_projects(projects);
        graph.skipped.extend(skipped);
        graph
    }

    /// Build the graph from already parsed projects
    pub fn from_projects(projects: Vec<Project>) -> Self {
        let mut names_by_id: HashMap<String, String> = HashMap::new();
        let mut parsed: Vec<Project> = Vec::with_capacity(projects.len());
        let mut seen: HashSet<String> = HashSet::with_capacity(projects.len());
        let mut skipped = Vec::new();

        for project in projects {
            if !seen.insert(project.name.clone()) {
                tracing::warn!("Duplicate project name {}, keeping the first", project.name);
                skipped.push(SkippedProject {
                    name: project.name.clone(),
                    reason: format!("duplicate project name ({})", project.path.display()),
                });
                continue;
            }
            match names_by_id.get(&project.identifier) {
                Some(owner) => tracing::warn!(
                    "Project {} reuses identifier {} of {owner}",
                    project.name,
                    project.identifier
                ),
                None => {
                    names_by_id.insert(project.identifier.clone(), project.name.clone());
                }
            }
            parsed.push(project);
        }

        let nodes = parsed
            .into_iter()
            .map(|project| {
                let dependencies = resolve_references(&project, &names_by_id);
                (
                    project.name.clone(),
                    GraphNode {
                        project,
                        dependencies,
                    },
                )
            })
            .collect();

        Self { nodes, skipped }
    }

    /// Get a node by project name
    pub fn get(&self, name: &str) -> Option<&GraphNode> {
        self.nodes.get(name)
    }

    /// Resolved dependencies of a project (empty if unknown)
    pub fn dependencies(&self, name: &str) -> &[String] {
        self.nodes
            .get(name)
            .map_or(&[][..], |node| node.dependencies.as_slice())
    }

    /// Whether a project is in the graph
    pub fn contains(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    /// Project names in lexicographic order
    pub fn sorted_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.nodes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Projects excluded during construction
    pub fn skipped(&self) -> &[SkippedProject] {
        &self.skipped
    }

    /// Number of projects in the graph
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if graph is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

fn resolve_references(project: &Project, names_by_id: &HashMap<String, String>) -> Vec<String> {
    let mut dependencies: Vec<String> = Vec::new();
    for reference in &project.references {
        match names_by_id.get(&reference.identifier) {
            Some(name) if !dependencies.contains(name) => dependencies.push(name.clone()),
            Some(_) => {}
            None => tracing::debug!(
                "{}: reference {} ({}) is external to the solution",
                project.name,
                reference.name,
                reference.identifier
            ),
        }
    }
    dependencies
}
