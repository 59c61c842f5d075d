//! Invocation of the external C preprocessor.
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;

use crate::config::PreprocessorConfig;
use crate::error::CommandError;
use crate::exec::CommandRunner;
use crate::logging::Log;
use crate::project::{PROCESSED_DIR, Project};
use crate::resources::helpers::fs::ensure_parent_dir;

/// Runs the configured preprocessor over files in `source/`, writing the
/// result to the same relative path under `processed/`.
#[derive(Debug, Clone)]
pub struct Preprocessor {
    runner: Arc<dyn CommandRunner>,
    config: PreprocessorConfig,
}

impl Preprocessor {
    /// Create a preprocessor that runs through `runner`.
    #[must_use]
    pub fn new(runner: Arc<dyn CommandRunner>, config: PreprocessorConfig) -> Self {
        Self { runner, config }
    }

    /// Build the argument vector for preprocessing `rel` with extra
    /// `-include` files. Paths are relative to `source/`, the working
    /// directory of the run.
    #[must_use]
    pub fn command_line(&self, rel: &str, includes: &[&str]) -> Vec<String> {
        let mut args = self.config.command.clone();
        args.push("-E".to_string());
        args.push(rel.to_string());
        args.extend(self.config.include_dirs.iter().map(|dir| format!("-I{dir}")));
        for include in includes {
            args.push("-include".to_string());
            args.push((*include).to_string());
        }
        args.extend(self.config.defines.iter().map(|def| format!("-D{def}")));
        args.push("-o".to_string());
        args.push(format!("../{PROCESSED_DIR}/{rel}"));
        args
    }

    /// Preprocess `rel` and return the path of the processed output.
    ///
    /// The runner overwrites its own output. Only the output's parent
    /// directory is created here; files under `processed/` are never touched.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::Failed`] on a non-zero exit and
    /// [`CommandError::OutputMissing`] when the output never appears.
    pub fn preprocess(
        &self,
        project: &Project,
        rel: &str,
        includes: &[&str],
        log: &dyn Log,
    ) -> Result<PathBuf> {
        let output = project.processed_path(rel);
        ensure_parent_dir(&output)?;

        let args = self.command_line(rel, includes);
        log.debug(&format!("preprocess: {}", args.join(" ")));
        let result = self.runner.run(&args, &project.source_dir())?;
        for line in &result.lines {
            log.debug(line);
        }
        if !result.success {
            return Err(CommandError::Failed {
                program: args.first().cloned().unwrap_or_default(),
                code: result.code.unwrap_or(-1),
                output: result.lines,
            }
            .into());
        }
        if !output.exists() {
            return Err(CommandError::OutputMissing { path: output }.into());
        }
        Ok(output)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::exec::{CommandOutput, MockCommandRunner};
    use crate::logging::isolated_logger;

    fn ok_output() -> CommandOutput {
        CommandOutput {
            success: true,
            code: Some(0),
            lines: Vec::new(),
        }
    }

    #[test]
    fn command_line_layout() {
        let pre = Preprocessor::new(
            Arc::new(MockCommandRunner::new()),
            PreprocessorConfig::default(),
        );
        let args = pre.command_line("src/data/items.h", &["include/config/item.h"]);
        assert_eq!(
            args.join(" "),
            "gcc -E src/data/items.h -Iinclude -include include/config/item.h -DTRUE -o ../processed/src/data/items.h"
        );
    }

    #[test]
    fn failed_run_is_command_error() {
        let (log, _tmp, _guard) = isolated_logger();
        let dir = tempfile::tempdir().unwrap();
        let project = Project::new(dir.path());
        let mut runner = MockCommandRunner::new();
        runner.expect_run().times(1).returning(|_, _| {
            Ok(CommandOutput {
                success: false,
                code: Some(1),
                lines: vec!["fatal error".to_string()],
            })
        });
        let pre = Preprocessor::new(Arc::new(runner), PreprocessorConfig::default());
        let err = pre.preprocess(&project, "a.h", &[], &log).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CommandError>(),
            Some(CommandError::Failed { code: 1, .. })
        ));
    }

    #[test]
    fn silent_success_without_output_is_missing() {
        let (log, _tmp, _guard) = isolated_logger();
        let dir = tempfile::tempdir().unwrap();
        let project = Project::new(dir.path());
        let mut runner = MockCommandRunner::new();
        runner.expect_run().returning(|_, _| Ok(ok_output()));
        let pre = Preprocessor::new(Arc::new(runner), PreprocessorConfig::default());
        let err = pre.preprocess(&project, "a.h", &[], &log).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CommandError>(),
            Some(CommandError::OutputMissing { .. })
        ));
    }

    #[test]
    fn runs_in_source_dir_and_returns_output() {
        let (log, _tmp, _guard) = isolated_logger();
        let dir = tempfile::tempdir().unwrap();
        let project = Project::new(dir.path());
        let expected_dir = project.source_dir();
        let processed = project.processed_path("a.h");
        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .withf(move |_, workdir| workdir == expected_dir)
            .returning(move |_, _| {
                std::fs::write(&processed, "int x;").unwrap();
                Ok(ok_output())
            });
        let pre = Preprocessor::new(Arc::new(runner), PreprocessorConfig::default());
        let out = pre.preprocess(&project, "a.h", &[], &log).unwrap();
        assert_eq!(std::fs::read_to_string(out).unwrap(), "int x;");
    }

    #[test]
    fn previous_output_is_left_for_the_runner() {
        let (log, _tmp, _guard) = isolated_logger();
        let dir = tempfile::tempdir().unwrap();
        let project = Project::new(dir.path());
        let processed = project.processed_path("a.h");
        std::fs::create_dir_all(project.processed_dir()).unwrap();
        std::fs::write(&processed, "int old;").unwrap();
        let seen = processed.clone();
        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .withf(move |_, _| std::fs::read_to_string(&seen).is_ok_and(|t| t == "int old;"))
            .times(1)
            .returning(move |_, _| {
                std::fs::write(&processed, "int new;").unwrap();
                Ok(ok_output())
            });
        let pre = Preprocessor::new(Arc::new(runner), PreprocessorConfig::default());
        let out = pre.preprocess(&project, "a.h", &[], &log).unwrap();
        assert_eq!(std::fs::read_to_string(out).unwrap(), "int new;");
    }
}
