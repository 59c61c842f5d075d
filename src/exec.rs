//! External command execution behind a mockable seam.
use std::path::Path;
use std::process::{Command, Output};

use anyhow::Result;

use crate::error::CommandError;

/// Result of a command execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Whether the process exited with status zero.
    pub success: bool,
    /// Exit code, when the process was not killed by a signal.
    pub code: Option<i32>,
    /// Combined stdout and stderr, one entry per line.
    pub lines: Vec<String>,
}

impl From<Output> for CommandOutput {
    fn from(output: Output) -> Self {
        let lines = String::from_utf8_lossy(&output.stdout)
            .lines()
            .chain(String::from_utf8_lossy(&output.stderr).lines())
            .map(String::from)
            .collect();
        Self {
            success: output.status.success(),
            code: output.status.code(),
            lines,
        }
    }
}

/// Abstraction over process execution.
///
/// The preprocessor goes through this trait so tests can substitute a
/// runner that never spawns a compiler.
#[cfg_attr(test, mockall::automock)]
pub trait CommandRunner: Send + Sync + std::fmt::Debug {
    /// Run `args[0]` with the remaining arguments inside `workdir`.
    ///
    /// A non-zero exit is reported through [`CommandOutput::success`], not
    /// as an error.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::Spawn`] if the process cannot be started or
    /// `args` is empty.
    fn run(&self, args: &[String], workdir: &Path) -> Result<CommandOutput>;
}

/// Runs commands as real child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    fn run(&self, args: &[String], workdir: &Path) -> Result<CommandOutput> {
        let Some((program, rest)) = args.split_first() else {
            return Err(CommandError::Spawn {
                program: String::new(),
                source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "empty command"),
            }
            .into());
        };
        tracing::debug!(
            program = program.as_str(),
            workdir = %workdir.display(),
            "spawning {}",
            args.join(" ")
        );
        let output = Command::new(program)
            .args(rest)
            .current_dir(workdir)
            .output()
            .map_err(|source| CommandError::Spawn {
                program: program.clone(),
                source,
            })?;
        Ok(CommandOutput::from(output))
    }
}
