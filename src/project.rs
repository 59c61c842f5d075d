//! Project layout: `source/`, `processed/` and `data/` under one root.
use std::path::{Path, PathBuf};

use anyhow::{Result, bail};

/// Directory holding the tracked C sources (mutated in place).
pub const SOURCE_DIR: &str = "source";
/// Directory the preprocessor writes into (read-only for the engine).
pub const PROCESSED_DIR: &str = "processed";
/// Directory of canonical documents, one per category.
pub const DATA_DIR: &str = "data";

/// An opened project root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    root: PathBuf,
}

impl Project {
    /// Wrap an existing root directory.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Find the project root.
    ///
    /// Order: `explicit` (the `--root` flag), `PORYSYNC_ROOT`, then the
    /// current directory or its nearest ancestor containing `source/`.
    ///
    /// # Errors
    ///
    /// Returns an error if no candidate is found.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        if let Some(root) = explicit {
            return Ok(Self::new(root));
        }

        if let Ok(root) = std::env::var("PORYSYNC_ROOT") {
            return Ok(Self::new(root));
        }

        let cwd = std::env::current_dir()?;
        if let Some(found) = cwd.ancestors().find(|dir| dir.join(SOURCE_DIR).is_dir()) {
            return Ok(Self::new(found));
        }

        bail!("cannot determine project root. Use --root or set PORYSYNC_ROOT");
    }

    /// The project root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<root>/source`.
    #[must_use]
    pub fn source_dir(&self) -> PathBuf {
        self.root.join(SOURCE_DIR)
    }

    /// `<root>/processed`.
    #[must_use]
    pub fn processed_dir(&self) -> PathBuf {
        self.root.join(PROCESSED_DIR)
    }

    /// `<root>/data`.
    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        self.root.join(DATA_DIR)
    }

    /// A path relative to `source/`.
    #[must_use]
    pub fn source_path(&self, rel: &str) -> PathBuf {
        self.source_dir().join(rel)
    }

    /// A path relative to `processed/`.
    #[must_use]
    pub fn processed_path(&self, rel: &str) -> PathBuf {
        self.processed_dir().join(rel)
    }

    /// The canonical document called `name` under `data/`.
    #[must_use]
    pub fn document_path(&self, name: &str) -> PathBuf {
        self.data_dir().join(name)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn explicit_root_wins() {
        let project = Project::resolve(Some(Path::new("/explicit/path"))).unwrap();
        assert_eq!(project.root(), Path::new("/explicit/path"));
    }

    #[test]
    fn layout_paths() {
        let project = Project::new("/p");
        assert_eq!(
            project.source_path("src/data/items.h"),
            PathBuf::from("/p/source/src/data/items.h")
        );
        assert_eq!(
            project.processed_path("src/data/items.h"),
            PathBuf::from("/p/processed/src/data/items.h")
        );
        assert_eq!(
            project.document_path("items.json"),
            PathBuf::from("/p/data/items.json")
        );
    }
}
