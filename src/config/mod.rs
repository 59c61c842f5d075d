//! Project configuration loaded from `porysync.toml` at the project root.
pub mod toml_loader;

use std::path::Path;

use anyhow::Result;
use serde::Deserialize;

use crate::categories::CategoryKind;
use crate::error::ConfigError;
use crate::expr::{ConstantTable, default_generation_constants};

/// File name of the optional project configuration.
pub const CONFIG_FILE: &str = "porysync.toml";

/// Top-level project configuration. Every section is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectConfig {
    /// How the external preprocessor is invoked.
    pub preprocessor: PreprocessorConfig,
    /// Render-time settings for code generation.
    pub generation: GenerationConfig,
    /// Category ids to manage; `None` means all of them.
    pub categories: Option<Vec<String>>,
}

/// Invocation of the C preprocessor.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PreprocessorConfig {
    /// Program followed by any leading arguments (for example a container
    /// wrapper such as `["docker", "exec", "build", "gcc"]`).
    pub command: Vec<String>,
    /// `-I` directories, relative to `source/`.
    pub include_dirs: Vec<String>,
    /// `-D` definitions.
    pub defines: Vec<String>,
}

impl Default for PreprocessorConfig {
    fn default() -> Self {
        Self {
            command: vec!["gcc".to_string()],
            include_dirs: vec!["include".to_string()],
            defines: vec!["TRUE".to_string()],
        }
    }
}

/// Code generation settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenerationConfig {
    /// Ordinals used to resolve conditional expressions. An empty table
    /// leaves conditionals in the output as written.
    pub constants: ConstantTable,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            constants: default_generation_constants(),
        }
    }
}

impl ProjectConfig {
    /// Load `porysync.toml` from `root`, or defaults when it is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(root: &Path) -> Result<Self> {
        toml_loader::load_config(&root.join(CONFIG_FILE))
    }

    /// The categories this project manages, in registry order.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownCategory`] for an unrecognised id.
    pub fn enabled_categories(&self) -> Result<Vec<CategoryKind>> {
        let Some(ids) = &self.categories else {
            return Ok(CategoryKind::ALL.to_vec());
        };
        for id in ids {
            if CategoryKind::from_id(id).is_none() {
                return Err(ConfigError::UnknownCategory(id.clone()).into());
            }
        }
        Ok(CategoryKind::ALL
            .iter()
            .copied()
            .filter(|kind| ids.iter().any(|id| id == kind.id()))
            .collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = ProjectConfig::load(dir.path()).unwrap();
        assert_eq!(cfg.preprocessor.command, vec!["gcc"]);
        assert_eq!(cfg.generation.constants.get("GEN_3"), Some(&2));
        assert_eq!(cfg.enabled_categories().unwrap().len(), CategoryKind::ALL.len());
    }

    #[test]
    fn explicit_empty_constants_disable_resolution() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "[generation]\nconstants = {}\n",
        )
        .unwrap();
        let cfg = ProjectConfig::load(dir.path()).unwrap();
        assert!(cfg.generation.constants.is_empty());
    }

    #[test]
    fn category_allow_list_keeps_registry_order() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "categories = [\"starters\", \"species\"]\n\n[preprocessor]\ncommand = [\"cpp\"]\n",
        )
        .unwrap();
        let cfg = ProjectConfig::load(dir.path()).unwrap();
        assert_eq!(
            cfg.enabled_categories().unwrap(),
            vec![CategoryKind::Species, CategoryKind::Starters]
        );
        assert_eq!(cfg.preprocessor.command, vec!["cpp"]);
        assert_eq!(cfg.preprocessor.include_dirs, vec!["include"]);
    }

    #[test]
    fn unknown_category_is_rejected() {
        let cfg = ProjectConfig {
            categories: Some(vec!["trainers".to_string()]),
            ..ProjectConfig::default()
        };
        let err = cfg.enabled_categories().unwrap_err();
        assert!(err.to_string().contains("trainers"));
    }
}
