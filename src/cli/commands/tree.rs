//! CLI command for displaying dependency tree
//!
//! Implements the `solbuild tree` command.

use std::path::PathBuf;

use anyhow::Result;

use crate::cli::commands::{load_solution, resolve_solution};
use crate::core::tree::DependencyTree;
use crate::error::SolbuildError;

/// Execute the tree command
pub fn execute(solution: Option<PathBuf>, project: Option<&str>, graph: bool) -> Result<i32> {
    let path = resolve_solution(solution)?;
    let loaded = load_solution(&path)?;

    if let Some(name) = project {
        if !loaded.graph.contains(name) {
            return Err(SolbuildError::ProjectNotFound {
                name: name.to_string(),
            }
            .into());
        }
    }

    let tree = DependencyTree::new(&loaded.graph);
    let output = match (project, graph) {
        (Some(name), true) => tree.format_dot_for_project(name),
        (Some(name), false) => tree.format_tree_for_project(name, &loaded.sequence),
        (None, true) => tree.format_dot(),
        (None, false) => tree.format_tree(&loaded.sequence),
    };
    println!("{output}");
    Ok(0)
}
