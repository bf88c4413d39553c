//! Dependency tree visualization
//!
//! Renders the project graph as an indented tree, a DOT graph, or the
//! numbered build order listing.

use std::collections::HashSet;
use std::fmt::Write;

use crate::core::graph::DependencyGraph;
use crate::core::resolver::Sequence;

/// Tree view over a dependency graph
#[derive(Debug)]
pub struct DependencyTree<'g> {
    graph: &'g DependencyGraph,
    roots: Vec<&'g str>,
}

impl<'g> DependencyTree<'g> {
    /// Create a tree rooted at the projects nothing else depends on
    ///
    /// If every project is depended upon (a cycle spanning the whole
    /// solution) all projects are used as roots.
    pub fn new(graph: &'g DependencyGraph) -> Self {
        let names = graph.sorted_names();
        let depended_on: HashSet<&str> = names
            .iter()
            .flat_map(|n| graph.dependencies(n).iter().map(String::as_str))
            .collect();

        let mut roots: Vec<&str> = names
            .iter()
            .copied()
            .filter(|n| !depended_on.contains(n))
            .collect();
        if roots.is_empty() {
            roots = names;
        }

        Self { graph, roots }
    }

    /// Root projects in alphabetical order
    pub fn roots(&self) -> &[&'g str] {
        &self.roots
    }

    /// Format as tree string
    pub fn format_tree(&self, sequence: &Sequence) -> String {
        if self.graph.is_empty() {
            return "No projects in solution".to_string();
        }

        let mut output = String::from("Dependency Tree:\n");
        push_cycles(&mut output, sequence, None);

        for (i, root) in self.roots.iter().enumerate() {
            let is_last = i == self.roots.len() - 1;
            self.format_node(&mut output, root, "", is_last, &mut HashSet::new());
        }

        output
    }

    /// Format tree for a specific project
    pub fn format_tree_for_project(&self, project: &str, sequence: &Sequence) -> String {
        if !self.graph.contains(project) {
            return format!("Project '{project}' not found in solution");
        }

        let mut output = format!("Dependencies for '{project}':\n");
        push_cycles(&mut output, sequence, Some(project));
        self.format_node(&mut output, project, "", true, &mut HashSet::new());
        output
    }

    fn format_node(
        &self,
        output: &mut String,
        node: &str,
        prefix: &str,
        is_last: bool,
        path: &mut HashSet<String>,
    ) {
        let connector = if is_last { "└── " } else { "├── " };
        let kind = self
            .graph
            .get(node)
            .map_or("?", |n| n.project.output_kind.short_label());

        if path.contains(node) {
            let _ = writeln!(output, "{prefix}{connector}{node} [{kind}] (cycle)");
            return;
        }
        let _ = writeln!(output, "{prefix}{connector}{node} [{kind}]");

        path.insert(node.to_string());
        let deps = self.graph.dependencies(node);
        let child_prefix = if is_last {
            format!("{prefix}    ")
        } else {
            format!("{prefix}│   ")
        };
        for (i, dep) in deps.iter().enumerate() {
            self.format_node(output, dep, &child_prefix, i == deps.len() - 1, path);
        }
        path.remove(node);
    }

    /// Format as DOT graph
    pub fn format_dot(&self) -> String {
        let names = self.graph.sorted_names();
        self.dot("dependencies", &names)
    }

    /// Format DOT graph for the projects reachable from `project`
    pub fn format_dot_for_project(&self, project: &str) -> String {
        if !self.graph.contains(project) {
            return format!("// Project '{project}' not found in solution");
        }

        let mut reachable = HashSet::new();
        self.collect_reachable(project, &mut reachable);
        let mut names: Vec<&str> = reachable.into_iter().collect();
        names.sort_unstable();
        self.dot(project, &names)
    }

    fn dot(&self, title: &str, names: &[&str]) -> String {
        let mut output = String::new();
        let _ = writeln!(output, "digraph \"{title}\" {{");
        output.push_str("    rankdir=TB;\n");
        output.push_str("    node [shape=box];\n\n");

        for name in names {
            let shape = match self.graph.get(name) {
                Some(node) if node.project.is_library() => "box",
                _ => "ellipse",
            };
            let _ = writeln!(output, "    \"{name}\" [shape={shape}];");
        }
        output.push('\n');

        for from in names {
            for dep in self.graph.dependencies(from) {
                let _ = writeln!(output, "    \"{from}\" -> \"{dep}\";");
            }
        }

        output.push_str("}\n");
        output
    }

    /// Collect all projects reachable from a given project
    fn collect_reachable<'a>(&'a self, project: &'a str, reachable: &mut HashSet<&'a str>) {
        let mut pending = vec![project];
        while let Some(name) = pending.pop() {
            if reachable.insert(name) {
                pending.extend(self.graph.dependencies(name).iter().map(String::as_str));
            }
        }
    }
}

/// Format the numbered build order with output kinds
pub fn format_order(graph: &DependencyGraph, sequence: &Sequence) -> String {
    if sequence.order.is_empty() {
        return "No projects in solution".to_string();
    }

    let width = sequence.order.len().to_string().len();
    let mut output = String::from("Build order:\n");
    for (i, name) in sequence.order.iter().enumerate() {
        let kind = graph
            .get(name)
            .map_or("?", |n| n.project.output_kind.short_label());
        let _ = writeln!(output, "  {:>width$}. {name} [{kind}]", i + 1);
    }
    push_cycles(&mut output, sequence, None);
    output
}

fn push_cycles(output: &mut String, sequence: &Sequence, only: Option<&str>) {
    for cycle in &sequence.cycles {
        if only.is_some_and(|p| !cycle.iter().any(|c| c == p)) {
            continue;
        }
        let _ = writeln!(
            output,
            "\n⚠ Circular dependency detected: {} -> {}",
            cycle.join(" -> "),
            cycle[0]
        );
    }
}
