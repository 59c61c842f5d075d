//! TOML configuration file parsing.
use anyhow::{Context as _, Result};
use serde::de::DeserializeOwned;
use std::path::Path;

use crate::error::ConfigError;

/// Load a TOML file into `T`.
///
/// A missing file is not an error: it deserializes as an empty document, so
/// `T` should carry `#[serde(default)]` to fall back to its defaults.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read, or if its
/// contents are not valid TOML for `T` ([`ConfigError::InvalidSyntax`]).
pub fn load_config<T: DeserializeOwned>(path: &Path) -> Result<T> {
    if !path.exists() {
        return toml::from_str("").context("Failed to create empty config");
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    toml::from_str(&content).map_err(|e| {
        ConfigError::InvalidSyntax {
            file: path.display().to_string(),
            message: e.message().to_string(),
        }
        .into()
    })
}
