//! Canonical JSON documents with dirty tracking.
//!
//! A [`RecordStore`] owns the in-memory records of one category together
//! with a snapshot of what was last read from or written to disk. Saving
//! compares the two, so untouched documents keep their bytes and mtime.
use std::io::Write as _;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Serialize as _;
use serde_json::ser::{PrettyFormatter, Serializer};
use tempfile::NamedTempFile;

use crate::error::StoreError;
use crate::model::Record;
use crate::resources::helpers::fs::ensure_parent_dir;

const INDENT: &[u8] = b"    ";

/// Serialize `records` the way documents are written: four-space indent,
/// keys in record order, trailing newline.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_json(records: &Record) -> Result<String> {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
    records.serialize(&mut ser)?;
    buf.push(b'\n');
    Ok(String::from_utf8(buf)?)
}

/// One canonical document on disk.
#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
    records: Record,
    snapshot: Option<Record>,
}

impl RecordStore {
    /// Load the document at `path`. A missing document yields an empty,
    /// dirty store.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the file exists but cannot be read and
    /// [`StoreError::Parse`] if it is not a valid document.
    pub fn load(path: &Path) -> Result<Self> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::empty(path));
            }
            Err(source) => {
                return Err(StoreError::Io {
                    path: path.to_path_buf(),
                    source,
                }
                .into());
            }
        };
        let records: Record =
            serde_json::from_str(&text).map_err(|source| StoreError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self {
            path: path.to_path_buf(),
            snapshot: Some(records.clone()),
            records,
        })
    }

    /// A store with no records and nothing on disk yet.
    #[must_use]
    pub fn empty(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            records: Record::new(),
            snapshot: None,
        }
    }

    /// Path of the document.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current records.
    #[must_use]
    pub const fn records(&self) -> &Record {
        &self.records
    }

    /// Current records, for editing.
    pub const fn records_mut(&mut self) -> &mut Record {
        &mut self.records
    }

    /// Swap in freshly extracted records.
    pub fn replace(&mut self, records: Record) {
        self.records = records;
    }

    /// Whether the records differ from the last load/save or the document
    /// does not exist.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.snapshot.as_ref() != Some(&self.records) || !self.path.exists()
    }

    /// Write the document if it is dirty. Returns whether anything was
    /// written.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be written.
    pub fn save(&mut self) -> Result<bool> {
        if !self.is_dirty() {
            return Ok(false);
        }
        self.force_save()?;
        Ok(true)
    }

    /// Write the document unconditionally.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the document cannot be staged or
    /// replaced.
    pub fn force_save(&mut self) -> Result<()> {
        let json = to_json(&self.records)?;
        ensure_parent_dir(&self.path)?;
        let io = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };
        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        let mut staged = NamedTempFile::new_in(dir).map_err(io)?;
        staged.write_all(json.as_bytes()).map_err(io)?;
        staged.persist(&self.path).map_err(|err| io(err.error))?;
        self.snapshot = Some(self.records.clone());
        Ok(())
    }
}
