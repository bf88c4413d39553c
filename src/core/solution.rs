//! Solution descriptor enumeration
//!
//! Scans a solution file for project entries and resolves their
//! descriptor paths against the solution directory.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::error::ParseError;
use crate::infra::filesystem;

/// A member project listed in a solution
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SolutionEntry {
    /// Display name
    pub name: String,
    /// Resolved descriptor path
    pub path: PathBuf,
}

/// A parsed solution
#[derive(Debug, Clone)]
pub struct Solution {
    /// Solution descriptor path
    pub path: PathBuf,
    /// Member projects in order of first appearance
    pub entries: Vec<SolutionEntry>,
}

fn project_entry_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"^\s*Project\("\{[^}]*\}"\)\s*=\s*"([^"]+)"\s*,\s*"([^"]+)""#)
            .expect("Invalid project entry pattern")
    })
}

impl Solution {
    /// Read and enumerate the solution at `path`
    ///
    /// A relative `path` is anchored at the current directory, so entry
    /// paths and the solution directory are always absolute.
    pub fn load(path: &Path) -> Result<Self, ParseError> {
        let path = filesystem::absolute(path).map_err(|e| ParseError::from_io(path, &e))?;
        let content = fs::read_to_string(&path).map_err(|e| ParseError::from_io(&path, &e))?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("/"));
        let entries = Self::parse_entries(&content, base_dir);

        tracing::info!(
            "Found {} projects in solution {}",
            entries.len(),
            path.display()
        );

        Ok(Self { path, entries })
    }

    /// Extract project entries whose descriptor exists under `base_dir`
    pub fn parse_entries(content: &str, base_dir: &Path) -> Vec<SolutionEntry> {
        let pattern = project_entry_pattern();

        content
            .lines()
            .filter_map(|line| pattern.captures(line))
            .filter_map(|caps| {
                let name = caps[1].trim().to_string();
                let relative = caps[2].replace('\\', "/");
                let path = base_dir.join(relative);
                if path.is_file() {
                    Some(SolutionEntry { name, path })
                } else {
                    tracing::debug!(
                        "Skipping solution entry {name}: {} does not exist",
                        path.display()
                    );
                    None
                }
            })
            .collect()
    }

    /// Directory containing the solution descriptor
    pub fn directory(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("."))
    }
}
