//! External tool invocation
//!
//! Runs the generator and compiler for one project at a time. Output of
//! each tool goes to a log file; every call blocks until the process exits.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::core::project::Project;
use crate::core::settings::{ToolConfig, Variant};
use crate::error::{BuildError, ConfigError};
use crate::infra::filesystem;

/// Everything a tool needs to process one project
#[derive(Debug, Clone, Copy)]
pub struct ToolRequest<'a> {
    /// Project to process
    pub project: &'a Project,
    /// Variant to build or generate for
    pub variant: Variant,
    /// Tool binaries directory
    pub bin_dir: &'a Path,
    /// Tool configuration directory
    pub config_dir: &'a Path,
    /// Where the tool output goes
    pub log_path: &'a Path,
}

/// Exit status of a tool run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolOutcome {
    /// Exit code, `None` if the process was killed by a signal
    pub exit_code: Option<i32>,
}

impl ToolOutcome {
    /// Outcome with the given exit code
    pub fn exited(code: i32) -> Self {
        Self {
            exit_code: Some(code),
        }
    }

    /// Whether the tool exited with code 0
    pub fn success(self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Generator and compiler used by the build executor
pub trait Toolchain {
    /// Produce source artifacts for one project
    fn generate(&mut self, request: &ToolRequest<'_>) -> Result<ToolOutcome, BuildError>;

    /// Compile one project
    fn compile(&mut self, request: &ToolRequest<'_>) -> Result<ToolOutcome, BuildError>;
}

/// A program plus its argument template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    /// Executable to run
    pub program: PathBuf,
    /// Arguments with `{placeholder}`s
    pub args: Vec<String>,
}

impl ToolCommand {
    /// Create a command from a program and argument template
    pub fn new(program: PathBuf, args: Vec<String>) -> Self {
        Self { program, args }
    }

    /// Substitute request values into the argument template
    ///
    /// Project, directory and log paths are rendered absolute since the
    /// tool runs inside the project directory.
    pub fn render_args(&self, request: &ToolRequest<'_>) -> Vec<String> {
        let anchored = |path: &Path| {
            filesystem::absolute(path)
                .unwrap_or_else(|_| path.to_path_buf())
                .display()
                .to_string()
        };
        let project_dir = request
            .project
            .path
            .parent()
            .map(anchored)
            .unwrap_or_default();
        let replacements = [
            ("{project}", anchored(&request.project.path)),
            ("{dir}", project_dir),
            ("{name}", request.project.name.clone()),
            ("{variant}", request.variant.to_string()),
            ("{bin}", request.bin_dir.display().to_string()),
            ("{config}", request.config_dir.display().to_string()),
            ("{log}", anchored(request.log_path)),
        ];

        self.args
            .iter()
            .map(|arg| {
                replacements
                    .iter()
                    .fold(arg.clone(), |acc, (key, value)| acc.replace(key, value))
            })
            .collect()
    }

    /// Run to completion with output redirected to the request's log
    pub fn run(
        &self,
        tool: &str,
        request: &ToolRequest<'_>,
        append: bool,
    ) -> Result<ToolOutcome, BuildError> {
        let args = self.render_args(request);
        let mut log = filesystem::open_log(request.log_path, append)?;
        let log_err = |e: std::io::Error| BuildError::Log {
            path: request.log_path.to_path_buf(),
            error: e.to_string(),
        };

        writeln!(
            log,
            "# {tool} {} ({}): {} {}",
            request.project.name,
            request.variant,
            self.program.display(),
            args.join(" ")
        )
        .map_err(log_err)?;
        let stderr = log.try_clone().map_err(log_err)?;

        let mut command = Command::new(&self.program);
        command
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::from(log))
            .stderr(Stdio::from(stderr));
        if let Some(dir) = request.project.path.parent().filter(|d| d.is_dir()) {
            command.current_dir(dir);
        }

        tracing::debug!(
            "Running {tool} for {}: {} {}",
            request.project.name,
            self.program.display(),
            args.join(" ")
        );

        let status = command.status().map_err(|e| BuildError::ToolLaunch {
            tool: tool.to_string(),
            program: self.program.clone(),
            error: e.to_string(),
        })?;

        Ok(ToolOutcome {
            exit_code: status.code(),
        })
    }
}

/// Toolchain that runs external processes
#[derive(Debug, Clone)]
pub struct ProcessToolchain {
    compiler: ToolCommand,
    generator: Option<ToolCommand>,
}

impl ProcessToolchain {
    /// Create a toolchain from explicit commands
    pub fn new(compiler: ToolCommand, generator: Option<ToolCommand>) -> Self {
        Self {
            compiler,
            generator,
        }
    }

    /// Create a toolchain from resolved configuration
    ///
    /// The compiler is always required; the generator only when building
    /// Debug, where a failed project is regenerated for Release.
    pub fn from_config(tools: &ToolConfig, variant: Variant) -> Result<Self, ConfigError> {
        let compiler = tools
            .compiler
            .clone()
            .ok_or_else(|| ConfigError::MissingTool {
                tool: "compiler".to_string(),
            })?;
        let generator = match (&tools.generator, variant) {
            (Some(program), _) => Some(ToolCommand::new(
                program.clone(),
                tools.generate_args.clone(),
            )),
            (None, Variant::Debug) => {
                return Err(ConfigError::MissingTool {
                    tool: "generator".to_string(),
                })
            }
            (None, Variant::Release) => None,
        };

        Ok(Self::new(
            ToolCommand::new(compiler, tools.compile_args.clone()),
            generator,
        ))
    }
}

impl Toolchain for ProcessToolchain {
    fn generate(&mut self, request: &ToolRequest<'_>) -> Result<ToolOutcome, BuildError> {
        match &self.generator {
            Some(generator) => generator.run("generator", request, true),
            None => Err(BuildError::ToolLaunch {
                tool: "generator".to_string(),
                program: PathBuf::new(),
                error: "no generator configured".to_string(),
            }),
        }
    }

    fn compile(&mut self, request: &ToolRequest<'_>) -> Result<ToolOutcome, BuildError> {
        self.compiler.run("compiler", request, false)
    }
}
