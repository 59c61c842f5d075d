//! Scoped reading and writing of C source files.
//!
//! Every write goes through [`SourceWriter`], which prepends [`BANNER`] and
//! stages content in a temporary file next to the target. The target is only
//! replaced by [`SourceWriter::commit`]; dropping an uncommitted writer (an
//! error path) deletes the temporary file and leaves the target untouched.
use std::io::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use tempfile::NamedTempFile;

use super::helpers::fs::ensure_parent_dir;
use crate::error::SourceError;

/// Header written at the top of every generated file.
pub const BANNER: &str = "// *** IMPORTANT ***\n\
// This file was generated by porysync.\n\
// Any changes made to this file will be lost when recompiling the project.\n\
\n";

/// Read a whole source file.
///
/// # Errors
///
/// Returns [`SourceError::Missing`] when the file does not exist and
/// [`SourceError::Io`] for any other read failure.
pub fn read_source(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            SourceError::Missing {
                path: path.to_path_buf(),
            }
            .into()
        } else {
            SourceError::Io {
                path: path.to_path_buf(),
                source,
            }
            .into()
        }
    })
}

/// Read `primary`, falling back to `fallback` when `primary` is missing.
///
/// # Errors
///
/// Returns the error for `fallback` when neither file can be read.
pub fn read_source_or(primary: &Path, fallback: &Path) -> Result<String> {
    match read_source(primary) {
        Ok(text) => Ok(text),
        Err(err) if is_missing(&err) => read_source(fallback),
        Err(err) => Err(err),
    }
}

/// Whether `err` is a [`SourceError::Missing`].
#[must_use]
pub fn is_missing(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<SourceError>(),
        Some(SourceError::Missing { .. })
    )
}

/// Staged writer for one generated file.
#[derive(Debug)]
pub struct SourceWriter {
    staged: NamedTempFile,
    target: PathBuf,
}

impl SourceWriter {
    /// Start writing `target`; the banner is written immediately.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory or temporary file cannot be
    /// created.
    pub fn create(target: &Path) -> Result<Self> {
        ensure_parent_dir(target)?;
        let dir = target.parent().unwrap_or_else(|| Path::new("."));
        let staged = NamedTempFile::new_in(dir)
            .with_context(|| format!("staging write for {}", target.display()))?;
        let mut writer = Self {
            staged,
            target: target.to_path_buf(),
        };
        writer.write_str(BANNER)?;
        Ok(writer)
    }

    /// Append raw text.
    ///
    /// # Errors
    ///
    /// Returns an error if the staged file cannot be written.
    pub fn write_str(&mut self, text: &str) -> Result<()> {
        self.staged
            .write_all(text.as_bytes())
            .with_context(|| format!("writing {}", self.target.display()))
    }

    /// Append `line` followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns an error if the staged file cannot be written.
    pub fn write_line(&mut self, line: &str) -> Result<()> {
        self.write_str(line)?;
        self.write_str("\n")
    }

    /// Atomically replace the target with the staged content.
    ///
    /// # Errors
    ///
    /// Returns an error if flushing or renaming fails.
    pub fn commit(mut self) -> Result<()> {
        self.staged
            .flush()
            .with_context(|| format!("flushing {}", self.target.display()))?;
        if let Ok(meta) = std::fs::metadata(&self.target) {
            std::fs::set_permissions(self.staged.path(), meta.permissions())
                .with_context(|| format!("copying permissions of {}", self.target.display()))?;
        }
        self.staged
            .persist(&self.target)
            .with_context(|| format!("replacing {}", self.target.display()))?;
        Ok(())
    }
}

/// Write `content` (after the banner) to `target` in one step.
///
/// # Errors
///
/// Returns an error if the file cannot be staged or committed.
pub fn write_source(target: &Path, content: &str) -> Result<()> {
    let mut writer = SourceWriter::create(target)?;
    writer.write_str(content)?;
    writer.commit()
}
