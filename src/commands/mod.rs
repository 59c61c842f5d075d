//! Top-level subcommands.
pub mod build;
pub mod extract;
pub mod restore;
pub mod set;
pub mod show;
pub mod status;
pub mod version;

use std::sync::Arc;

use anyhow::Result;

use crate::categories::CategoryKind;
use crate::cli::GlobalOpts;
use crate::config::ProjectConfig;
use crate::error::ConfigError;
use crate::exec::ProcessRunner;
use crate::logging::Logger;
use crate::manager::DataManager;
use crate::project::Project;

/// Shared state produced by the common command setup sequence.
///
/// Resolves the project root, loads `porysync.toml` and builds the
/// [`DataManager`] so each command does not repeat the boilerplate.
#[derive(Debug)]
pub struct CommandSetup {
    /// Loaded `porysync.toml`.
    pub config: ProjectConfig,
    /// Category orchestration for the resolved project.
    pub manager: DataManager,
}

impl CommandSetup {
    /// Resolve the root, load the configuration and build the manager.
    ///
    /// # Errors
    ///
    /// Returns an error if the root cannot be determined or the
    /// configuration is invalid.
    pub fn init(global: &GlobalOpts, log: &Logger) -> Result<Self> {
        let project = Project::resolve(global.root.as_deref())?;
        log.debug(&format!("project root: {}", project.root().display()));

        let config = ProjectConfig::load(project.root())?;
        log.debug(&format!(
            "preprocessor: {}",
            config.preprocessor.command.join(" ")
        ));
        log.debug(&format!(
            "{} generation constants",
            config.generation.constants.len()
        ));

        let manager = DataManager::new(project, &config, Arc::new(ProcessRunner))?;
        let enabled: Vec<_> = manager.kinds().map(CategoryKind::id).collect();
        log.info(&format!("categories: {}", enabled.join(", ")));

        Ok(Self { config, manager })
    }
}

/// Parse a category id given on the command line.
///
/// # Errors
///
/// Returns [`ConfigError::UnknownCategory`] for an unknown id.
pub fn parse_category(id: &str) -> Result<CategoryKind> {
    Ok(CategoryKind::from_id(id).ok_or_else(|| ConfigError::UnknownCategory(id.to_string()))?)
}

/// Split a dot-separated record path.
#[must_use]
pub fn split_path(path: &str) -> Vec<&str> {
    path.split('.').filter(|part| !part.is_empty()).collect()
}

/// Print the summary and bail if any category failed.
///
/// # Errors
///
/// Returns an error if one or more categories recorded a failure.
pub fn finish(log: &Logger) -> Result<()> {
    log.print_summary();

    let count = log.failure_count();
    if count > 0 {
        anyhow::bail!("{count} category step(s) failed");
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn category_ids_parse() {
        assert_eq!(parse_category("moves").unwrap(), CategoryKind::Moves);
        let err = parse_category("trainers").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::UnknownCategory(id)) if id == "trainers"
        ));
    }

    #[test]
    fn paths_split_on_dots() {
        assert_eq!(
            split_path("SPECIES_BULBASAUR.species_info.baseHP"),
            vec!["SPECIES_BULBASAUR", "species_info", "baseHP"]
        );
        assert!(split_path("").is_empty());
    }
}
