//! Tracked source files: hand-authored originals paired with pristine
//! backups, and files owned entirely by a generator.
use std::path::PathBuf;

use anyhow::Result;

use super::helpers::fs::{copy_file, ensure_parent_dir, remove_existing};
use super::{Applicable, Resource, ResourceChange, ResourceState};
use crate::error::SourceError;
use crate::project::Project;

/// Suffix appended to an original's path to form its backup.
pub const BACKUP_SUFFIX: &str = ".bak";

/// An upstream source file that generation rewrites in place.
///
/// The backup is an untouched copy of the pristine upstream file, created
/// lazily before the first rewrite. [`apply`](Applicable::apply) ensures the
/// backup; [`remove`](Applicable::remove) restores the original from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileBinding {
    /// Path relative to `source/`.
    pub rel: String,
    /// Absolute path of the original.
    pub original: PathBuf,
    /// Absolute path of the backup.
    pub backup: PathBuf,
}

impl FileBinding {
    /// Bind `rel` (relative to `source/`) within `project`.
    #[must_use]
    pub fn new(project: &Project, rel: &str) -> Self {
        let original = project.source_path(rel);
        let backup = project.source_path(&format!("{rel}{BACKUP_SUFFIX}"));
        Self {
            rel: rel.to_string(),
            original,
            backup,
        }
    }
}

impl Applicable for FileBinding {
    fn description(&self) -> String {
        format!("{} (backup {}{BACKUP_SUFFIX})", self.rel, self.rel)
    }

    /// Copy original to backup if no backup exists yet.
    fn apply(&self) -> Result<ResourceChange> {
        if self.backup.exists() {
            return Ok(ResourceChange::AlreadyCorrect);
        }
        if !self.original.exists() {
            return Err(SourceError::Missing {
                path: self.original.clone(),
            }
            .into());
        }
        copy_file(&self.original, &self.backup)?;
        Ok(ResourceChange::Applied)
    }

    /// Copy the backup over the original and drop the backup. No backup
    /// means nothing was ever rewritten, so this is a no-op.
    fn remove(&self) -> Result<ResourceChange> {
        if !self.backup.exists() {
            return Ok(ResourceChange::AlreadyCorrect);
        }
        copy_file(&self.backup, &self.original)?;
        remove_existing(&self.backup)?;
        Ok(ResourceChange::Applied)
    }
}

impl Resource for FileBinding {
    fn current_state(&self) -> Result<ResourceState> {
        Ok(match (self.original.exists(), self.backup.exists()) {
            (true, true) => ResourceState::Correct,
            (true, false) => ResourceState::Missing,
            (false, true) => ResourceState::Incorrect {
                current: "original missing".to_string(),
            },
            (false, false) => ResourceState::Invalid {
                reason: format!("{} does not exist", self.original.display()),
            },
        })
    }
}

/// A file produced entirely by a generator, with no upstream counterpart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// Path relative to `source/`.
    pub rel: String,
    /// Absolute path.
    pub path: PathBuf,
}

impl GeneratedFile {
    /// Declare `rel` (relative to `source/`) within `project`.
    #[must_use]
    pub fn new(project: &Project, rel: &str) -> Self {
        Self {
            rel: rel.to_string(),
            path: project.source_path(rel),
        }
    }
}

impl Applicable for GeneratedFile {
    fn description(&self) -> String {
        format!("{} (generated)", self.rel)
    }

    /// Prepare the destination directory for the generator.
    fn apply(&self) -> Result<ResourceChange> {
        if self.path.parent().is_some_and(std::path::Path::is_dir) {
            return Ok(ResourceChange::AlreadyCorrect);
        }
        ensure_parent_dir(&self.path)?;
        Ok(ResourceChange::Applied)
    }

    /// Delete the generated file.
    fn remove(&self) -> Result<ResourceChange> {
        if !self.path.exists() {
            return Ok(ResourceChange::AlreadyCorrect);
        }
        remove_existing(&self.path)?;
        Ok(ResourceChange::Applied)
    }
}

impl Resource for GeneratedFile {
    fn current_state(&self) -> Result<ResourceState> {
        Ok(if self.path.exists() {
            ResourceState::Correct
        } else {
            ResourceState::Missing
        })
    }
}

/// Ensure every binding has a backup.
///
/// # Errors
///
/// Returns an error if an original is missing while its backup is absent, or
/// a copy fails.
pub fn ensure_backups(bindings: &[FileBinding]) -> Result<()> {
    for binding in bindings {
        binding.apply()?;
    }
    Ok(())
}

/// Roll the tree back: every binding with a backup gets its original
/// restored, and every generated file is deleted.
///
/// Idempotent; with no backups and no generated files present this is a
/// no-op. Returns how many files were touched.
///
/// # Errors
///
/// Returns an error if a copy or delete fails.
pub fn restore(bindings: &[FileBinding], generated: &[GeneratedFile]) -> Result<usize> {
    let mut touched = 0;
    for binding in bindings {
        if binding.remove()? == ResourceChange::Applied {
            touched += 1;
        }
    }
    for file in generated {
        if file.remove()? == ResourceChange::Applied {
            touched += 1;
        }
    }
    Ok(touched)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn project() -> (tempfile::TempDir, Project) {
        let dir = tempfile::tempdir().unwrap();
        let project = Project::new(dir.path());
        (dir, project)
    }

    fn write(path: &std::path::Path, text: &str) {
        ensure_parent_dir(path).unwrap();
        std::fs::write(path, text).unwrap();
    }

    #[test]
    fn backup_path_appends_suffix() {
        let binding = FileBinding::new(&Project::new("/p"), "src/starter_choose.c");
        assert_eq!(
            binding.backup,
            PathBuf::from("/p/source/src/starter_choose.c.bak")
        );
    }

    #[test]
    fn ensure_backup_copies_once() {
        let (_dir, project) = project();
        let binding = FileBinding::new(&project, "src/a.c");
        write(&binding.original, "pristine");
        assert_eq!(binding.current_state().unwrap(), ResourceState::Missing);
        assert_eq!(binding.apply().unwrap(), ResourceChange::Applied);

        write(&binding.original, "rewritten");
        assert_eq!(binding.apply().unwrap(), ResourceChange::AlreadyCorrect);
        assert_eq!(std::fs::read_to_string(&binding.backup).unwrap(), "pristine");
        assert_eq!(binding.current_state().unwrap(), ResourceState::Correct);
    }

    #[test]
    fn ensure_backup_without_original_is_missing_source() {
        let (_dir, project) = project();
        let binding = FileBinding::new(&project, "src/a.c");
        let err = binding.apply().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SourceError>(),
            Some(SourceError::Missing { .. })
        ));
    }

    #[test]
    fn restore_without_backups_is_noop() {
        let (_dir, project) = project();
        let binding = FileBinding::new(&project, "src/a.c");
        let generated = GeneratedFile::new(&project, "src/gen.h");
        assert_eq!(restore(&[binding], &[generated]).unwrap(), 0);
    }

    #[test]
    fn restore_copies_backup_and_deletes_generated() {
        let (_dir, project) = project();
        let binding = FileBinding::new(&project, "src/a.c");
        let generated = GeneratedFile::new(&project, "src/gen.h");
        write(&binding.original, "pristine");
        binding.apply().unwrap();
        write(&binding.original, "rewritten");
        write(&generated.path, "generated");

        let touched = restore(
            std::slice::from_ref(&binding),
            std::slice::from_ref(&generated),
        )
        .unwrap();
        assert_eq!(touched, 2);
        assert_eq!(std::fs::read_to_string(&binding.original).unwrap(), "pristine");
        assert!(!binding.backup.exists());
        assert!(!generated.path.exists());

        assert_eq!(restore(&[binding], &[generated]).unwrap(), 0);
    }
}
