//! Build order resolution
//!
//! Computes a build order in which dependencies precede dependents.
//! Cycles do not fail the sort: they are recorded and the order stays
//! complete, with precedence possibly violated along cycle edges.

use std::collections::HashMap;

use serde::Serialize;

use crate::core::graph::DependencyGraph;

/// Names of projects forming a dependency cycle
pub type CycleRecord = Vec<String>;

/// Result of sequencing a dependency graph
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Sequence {
    /// Every project exactly once, dependencies first where possible
    pub order: Vec<String>,
    /// Cycles found during traversal
    pub cycles: Vec<CycleRecord>,
}

impl Sequence {
    /// Whether at least one cycle was found
    pub fn has_circular_dependencies(&self) -> bool {
        !self.cycles.is_empty()
    }

    /// Position of a project in the build order
    pub fn position(&self, name: &str) -> Option<usize> {
        self.order.iter().position(|n| n == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VisitState {
    Visiting,
    Visited,
}

struct Frame<'g> {
    name: &'g str,
    next_dependency: usize,
}

/// Compute the build order of `graph`
///
/// Depth-first, post-order. Top-level nodes are visited in lexicographic
/// order and dependencies in declaration order, so the result only
/// depends on the graph contents.
pub fn sequence(graph: &DependencyGraph) -> Sequence {
    let mut state: HashMap<&str, VisitState> = HashMap::with_capacity(graph.len());
    let mut result = Sequence::default();
    let mut stack: Vec<Frame<'_>> = Vec::new();

    for root in graph.sorted_names() {
        if state.contains_key(root) {
            continue;
        }
        state.insert(root, VisitState::Visiting);
        stack.push(Frame {
            name: root,
            next_dependency: 0,
        });

        while let Some(frame) = stack.last_mut() {
            let dependencies = graph.dependencies(frame.name);

            let Some(dependency) = dependencies.get(frame.next_dependency) else {
                state.insert(frame.name, VisitState::Visited);
                result.order.push(frame.name.to_string());
                stack.pop();
                continue;
            };
            frame.next_dependency += 1;

            match state.get(dependency.as_str()) {
                None => {
                    state.insert(dependency, VisitState::Visiting);
                    stack.push(Frame {
                        name: dependency,
                        next_dependency: 0,
                    });
                }
                Some(VisitState::Visiting) => {
                    let start = stack
                        .iter()
                        .position(|f| f.name == dependency.as_str())
                        .unwrap_or(0);
                    let cycle: CycleRecord =
                        stack[start..].iter().map(|f| f.name.to_string()).collect();
                    tracing::debug!("Dependency cycle: {}", cycle.join(" -> "));
                    result.cycles.push(cycle);
                }
                Some(VisitState::Visited) => {}
            }
        }
    }

    if result.has_circular_dependencies() {
        tracing::info!(
            "Found {} dependency cycle(s); build will use two passes",
            result.cycles.len()
        );
    }

    result
}
