//! CLI command for printing the build order
//!
//! Implements the `solbuild order` command.

use std::path::PathBuf;

use anyhow::Result;
use serde::Serialize;

use crate::cli::commands::{load_solution, resolve_solution, LoadedSolution};
use crate::cli::output::{is_json, print_warning};
use crate::core::resolver::CycleRecord;
use crate::core::tree;

#[derive(Debug, Serialize)]
struct OrderEntry<'a> {
    position: usize,
    name: &'a str,
    kind: &'static str,
}

#[derive(Debug, Serialize)]
struct OrderOutput<'a> {
    order: Vec<OrderEntry<'a>>,
    cycles: &'a [CycleRecord],
    skipped: Vec<&'a str>,
}

fn order_output(loaded: &LoadedSolution) -> OrderOutput<'_> {
    let order = loaded
        .sequence
        .order
        .iter()
        .enumerate()
        .map(|(i, name)| OrderEntry {
            position: i + 1,
            name,
            kind: loaded
                .graph
                .get(name)
                .map_or("?", |n| n.project.output_kind.short_label()),
        })
        .collect();

    OrderOutput {
        order,
        cycles: &loaded.sequence.cycles,
        skipped: loaded.graph.skipped().iter().map(|s| s.name.as_str()).collect(),
    }
}

/// Execute the order command
pub fn execute(solution: Option<PathBuf>) -> Result<i32> {
    let path = resolve_solution(solution)?;
    let loaded = load_solution(&path)?;

    if is_json() {
        println!("{}", serde_json::to_string_pretty(&order_output(&loaded))?);
        return Ok(0);
    }

    for skipped in loaded.graph.skipped() {
        print_warning(&format!("Skipping {}: {}", skipped.name, skipped.reason));
    }
    println!("{}", tree::format_order(&loaded.graph, &loaded.sequence));
    Ok(0)
}
