//! Collaborators that produce raw benchmark output
//!
//! The statistics engine only consumes text. Getting hold of two revisions
//! of some code and running its benchmarks is delegated to a
//! [`ModuleFetcher`] and a [`BenchRunner`]; [`stat_module`] wires them
//! together.

use crate::error::{Error, Result};
use crate::stat::{stat, StatConfig, StatResult};
use std::io;
use std::path::PathBuf;
use std::process::Command;
use thiserror::Error;

/// Placeholder replaced by the benchmark pattern in runner arguments
pub const PATTERN_PLACEHOLDER: &str = "{pattern}";

/// An external command that could not be run or exited unsuccessfully
#[derive(Error, Debug)]
#[error("command `{cmd}` failed: {source}")]
pub struct CmdError {
    /// Command line as it was run
    pub cmd: String,
    /// Combined stdout and stderr captured before the failure
    pub output: String,
    #[source]
    pub source: io::Error,
}

impl CmdError {
    pub fn new(cmd: impl Into<String>, output: impl Into<String>, source: io::Error) -> Self {
        Self {
            cmd: cmd.into(),
            output: output.into(),
            source,
        }
    }
}

/// A specific revision of some code, ready to be benchmarked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    pub name: String,
    pub version: String,
    /// Directory holding the code
    pub path: PathBuf,
}

/// Makes a given version of a module available on disk
pub trait ModuleFetcher {
    fn fetch(&self, module: &str, version: &str) -> std::result::Result<Module, CmdError>;
}

/// Runs the benchmarks of a fetched module
pub trait BenchRunner {
    /// Run benchmarks matching `pattern` `count` times
    ///
    /// Returns every output line of every run, in order.
    fn run(
        &self,
        module: &Module,
        pattern: &str,
        count: usize,
    ) -> std::result::Result<Vec<String>, CmdError>;
}

/// Resolves versions to directories that already exist locally
///
/// `version` is taken as a directory name under `root`, or as a path on
/// its own when no root is set. Nothing is downloaded.
#[derive(Debug, Clone, Default)]
pub struct LocalFetcher {
    root: Option<PathBuf>,
}

impl LocalFetcher {
    pub fn new(root: Option<PathBuf>) -> Self {
        Self { root }
    }
}

impl ModuleFetcher for LocalFetcher {
    fn fetch(&self, module: &str, version: &str) -> std::result::Result<Module, CmdError> {
        let path = match &self.root {
            Some(root) => root.join(version),
            None => PathBuf::from(version),
        };

        if !path.is_dir() {
            return Err(CmdError::new(
                format!("fetch {}@{}", module, version),
                String::new(),
                io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("{} is not a directory", path.display()),
                ),
            ));
        }

        tracing::debug!("{}@{} resolved to {}", module, version, path.display());
        Ok(Module {
            name: module.to_string(),
            version: version.to_string(),
            path,
        })
    }
}

/// Runs a user supplied program inside the module directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRunner {
    program: String,
    args: Vec<String>,
}

impl CommandRunner {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// `go test` restricted to benchmarks, one run per invocation
    pub fn go_test() -> Self {
        Self::new(
            "go",
            ["test", "-run", "^$", "-count", "1", "-bench", PATTERN_PLACEHOLDER]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        )
    }

    /// Arguments with the pattern substituted
    pub fn args_for(&self, pattern: &str) -> Vec<String> {
        self.args
            .iter()
            .map(|arg| arg.replace(PATTERN_PLACEHOLDER, pattern))
            .collect()
    }

    fn command_line(&self, args: &[String]) -> String {
        std::iter::once(self.program.as_str())
            .chain(args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl BenchRunner for CommandRunner {
    fn run(
        &self,
        module: &Module,
        pattern: &str,
        count: usize,
    ) -> std::result::Result<Vec<String>, CmdError> {
        let args = self.args_for(pattern);
        let cmd = self.command_line(&args);
        let mut lines = Vec::new();

        for run in 1..=count {
            tracing::info!("[{}/{}] {} (in {})", run, count, cmd, module.path.display());

            let output = Command::new(&self.program)
                .args(&args)
                .current_dir(&module.path)
                .output()
                .map_err(|e| CmdError::new(&cmd, String::new(), e))?;

            let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
            combined.push_str(&String::from_utf8_lossy(&output.stderr));

            if !output.status.success() {
                return Err(CmdError::new(
                    &cmd,
                    combined,
                    io::Error::other(format!("exited with {}", output.status)),
                ));
            }

            lines.extend(combined.lines().map(str::to_string));
        }

        Ok(lines)
    }
}

/// What to compare when benchmarking a module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatRequest {
    pub module: String,
    pub old: String,
    pub new: String,
    /// Benchmark selection pattern handed to the runner
    pub pattern: String,
    /// Number of runs per revision
    pub count: usize,
}

/// Fetch both revisions, benchmark them and compare the outputs
///
/// # Errors
/// - [`Error::Config`] if `count` is zero or `config` is invalid
/// - [`Error::Command`] if fetching or running fails
pub fn stat_module<F, R>(
    fetcher: &F,
    runner: &R,
    request: &StatRequest,
    config: &StatConfig,
) -> Result<Vec<StatResult>>
where
    F: ModuleFetcher + ?Sized,
    R: BenchRunner + ?Sized,
{
    if request.count == 0 {
        return Err(Error::Config("count must be at least 1".to_string()));
    }
    config.validate()?;

    let old_module = fetcher.fetch(&request.module, &request.old)?;
    let new_module = fetcher.fetch(&request.module, &request.new)?;

    tracing::info!("benchmarking {} @ {}", request.module, request.old);
    let old_lines = runner.run(&old_module, &request.pattern, request.count)?;
    tracing::info!("benchmarking {} @ {}", request.module, request.new);
    let new_lines = runner.run(&new_module, &request.pattern, request.count)?;

    stat(&old_lines, &new_lines, config)
}
