//! File-system resource helpers.
use anyhow::{Context as _, Result};
use std::path::Path;
use std::time::SystemTime;

/// Ensure the parent directory of `path` exists, creating it (and any
/// ancestors) if necessary.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create parent: {}", parent.display()))?;
    }
    Ok(())
}

/// Remove an existing file at `path`. Does nothing if `path` does not exist.
///
/// # Errors
///
/// Returns an error if the path exists but cannot be removed.
pub fn remove_existing(path: &Path) -> Result<()> {
    if path.exists() || path.symlink_metadata().is_ok() {
        std::fs::remove_file(path)
            .with_context(|| format!("remove existing: {}", path.display()))?;
    }
    Ok(())
}

/// Copy `src` over `dst`, creating `dst`'s parent directory first.
///
/// # Errors
///
/// Returns an error if the parent cannot be created or the copy fails.
pub fn copy_file(src: &Path, dst: &Path) -> Result<()> {
    ensure_parent_dir(dst)?;
    std::fs::copy(src, dst)
        .with_context(|| format!("copying {} to {}", src.display(), dst.display()))?;
    Ok(())
}

/// Modification time of `path`, or `None` if it does not exist or the
/// platform cannot report it.
#[must_use]
pub fn modified(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}

/// Set the modification time of an existing file.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or its times updated.
pub fn set_modified(path: &Path, time: SystemTime) -> Result<()> {
    std::fs::File::options()
        .write(true)
        .open(path)
        .and_then(|file| file.set_modified(time))
        .with_context(|| format!("stamping {}", path.display()))
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn ensure_parent_dir_creates_missing_parents() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b").join("file.txt");
        ensure_parent_dir(&nested).unwrap();
        assert!(dir.path().join("a").join("b").exists());
    }

    #[test]
    fn remove_existing_removes_regular_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("target");
        std::fs::write(&file, "content").unwrap();
        remove_existing(&file).unwrap();
        assert!(!file.exists());
    }

    #[test]
    fn remove_existing_noop_when_path_absent() {
        let dir = tempfile::tempdir().unwrap();
        remove_existing(&dir.path().join("nonexistent")).unwrap();
    }

    #[test]
    fn copy_file_creates_destination_parent() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("a.h");
        std::fs::write(&src, "int x;\n").unwrap();
        let dst = dir.path().join("deep/dir/a.h.bak");
        copy_file(&src, &dst).unwrap();
        assert_eq!(std::fs::read_to_string(dst).unwrap(), "int x;\n");
    }

    #[test]
    fn modified_is_none_for_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(modified(&dir.path().join("missing")).is_none());
        let file = dir.path().join("present");
        std::fs::write(&file, "").unwrap();
        assert!(modified(&file).is_some());
    }

    #[test]
    fn set_modified_moves_mtime() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("stamped");
        std::fs::write(&file, "").unwrap();
        let past = SystemTime::UNIX_EPOCH + std::time::Duration::from_secs(1_000_000);
        set_modified(&file, past).unwrap();
        assert_eq!(modified(&file), Some(past));
        assert!(set_modified(&dir.path().join("missing"), past).is_err());
    }
}
