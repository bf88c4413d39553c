//! Common test utilities and helpers
//!
//! This module provides shared utilities for integration tests: a
//! temporary solution on disk and a scripted toolchain.

#![allow(dead_code)]

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use solbuild::core::settings::Variant;
use solbuild::error::BuildError;
use solbuild::infra::filesystem;
use solbuild::infra::toolchain::{ToolOutcome, ToolRequest, Toolchain};
use tempfile::TempDir;

/// Name of the solution file written by [`TestProject::write_solution`]
pub const SOLUTION_FILE: &str = "app.sln";

const PROJECT_TYPE: &str = "F184B08F-C81C-45F6-A57F-5ABD9991F28F";

/// Test project context
///
/// Creates a temporary directory holding a solution and its project
/// descriptors.
pub struct TestProject {
    /// Temporary directory for the test solution
    pub dir: TempDir,
    projects: Vec<String>,
}

impl TestProject {
    /// Create a new test project in a temporary directory
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
            projects: Vec::new(),
        }
    }

    /// Get the path to the test project directory
    pub fn path(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    /// Path of the solution file
    pub fn solution_path(&self) -> PathBuf {
        self.dir.path().join(SOLUTION_FILE)
    }

    /// Create a file in the test project
    pub fn create_file(&self, name: &str, content: &str) {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        std::fs::write(path, content).expect("Failed to write file");
    }

    /// Check if a file exists in the test project
    pub fn file_exists(&self, name: &str) -> bool {
        self.dir.path().join(name).exists()
    }

    /// Read a file from the test project
    pub fn read_file(&self, name: &str) -> String {
        std::fs::read_to_string(self.dir.path().join(name)).expect("Failed to read file")
    }

    /// Write `<name>/<name>.xsproj` referencing `deps` and list it in the solution
    ///
    /// Identifiers are derived from names, so references written here
    /// resolve to the projects of the same name.
    pub fn add_project(&mut self, name: &str, output_type: &str, deps: &[&str]) -> &mut Self {
        let references: String = deps
            .iter()
            .map(|dep| {
                format!(
                    "    <ProjectReference Include=\"..\\{dep}\\{dep}.xsproj\">\n      \
                     <Project>{{{}}}</Project>\n      <Name>{dep}</Name>\n    </ProjectReference>\n",
                    identifier(dep)
                )
            })
            .collect();

        let content = format!(
            r#"<?xml version="1.0" encoding="utf-8"?>
<Project ToolsVersion="4.0" xmlns="http://schemas.microsoft.com/developer/msbuild/2003">
  <PropertyGroup>
    <ProjectGuid>{{{}}}</ProjectGuid>
    <OutputType>{output_type}</OutputType>
  </PropertyGroup>
  <ItemGroup>
{references}  </ItemGroup>
</Project>
"#,
            identifier(name)
        );

        self.create_file(&format!("{name}/{name}.xsproj"), &content);
        self.projects.push(name.to_string());
        self
    }

    /// Add a library project
    pub fn library(&mut self, name: &str, deps: &[&str]) -> &mut Self {
        self.add_project(name, "Library", deps)
    }

    /// Write the solution listing every added project
    pub fn write_solution(&self) -> PathBuf {
        let mut content = String::from(
            "Microsoft Visual Studio Solution File, Format Version 12.00\n",
        );
        for name in &self.projects {
            content.push_str(&format!(
                "Project(\"{{{PROJECT_TYPE}}}\") = \"{name}\", \"{name}\\{name}.xsproj\", \"{{{}}}\"\nEndProject\n",
                identifier(name)
            ));
        }
        content.push_str("Global\nEndGlobal\n");

        self.create_file(SOLUTION_FILE, &content);
        self.solution_path()
    }

    /// Run the solbuild binary in the project directory
    ///
    /// Global and data directories point inside the temp dir so runs never
    /// touch the user's configuration or share a lock with other tests.
    pub fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_solbuild"))
            .current_dir(self.dir.path())
            .env("SOLBUILD_CONFIG_DIR", self.dir.path().join(".config"))
            .env("SOLBUILD_DATA_DIR", self.dir.path().join(".data"))
            .env_remove("RUST_LOG")
            .env_remove("SOLBUILD_LOGS_DIR")
            .args(args)
            .output()
            .expect("Failed to execute solbuild")
    }
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

/// Stable identifier for a project name
pub fn identifier(name: &str) -> String {
    let hex: String = name.bytes().map(|b| format!("{b:02X}")).collect();
    format!("{hex:0<8}-0000-0000-0000-000000000000")
}

/// Failure count that never runs out
pub const ALWAYS: usize = usize::MAX;

/// Which tool a scripted call went to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolKind {
    Generate,
    Compile,
}

/// Toolchain with scripted compile failures that records every call
///
/// Mirrors the crate's unit-test toolchain for use from integration tests.
#[derive(Debug, Default)]
pub struct ScriptedToolchain {
    compile_failures: HashMap<(String, Variant), usize>,
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
        self.record(ToolKind::Generate, request, 0)
    }

    fn compile(&mut self, request: &ToolRequest<'_>) -> Result<ToolOutcome, BuildError> {
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

/// Write a shell script tool and return its path
#[cfg(unix)]
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("Failed to write script");
    let mut perms = std::fs::metadata(&path)
        .expect("Failed to stat script")
        .permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).expect("Failed to chmod script");
    path
}
