//! Inverse of extraction: C emission from canonical records.
//!
//! Two modes, both driven by a [`Generator`]:
//!
//! - whole-file regeneration of [`GeneratedFile`](crate::resources::GeneratedFile)s
//!   (banner plus one block per entity, see [`emit`]);
//! - splicing of hand-authored files, always reading the
//!   [`FileBinding`](crate::resources::FileBinding) backup so repeated builds
//!   never compound (see [`splice`]).
pub mod emit;
pub mod splice;

use anyhow::Result;

use crate::expr::ConstantTable;
use crate::logging::Log;
use crate::model::Record;
use crate::project::Project;
use crate::resources::FileBinding;
use crate::resources::source_file::{read_source, write_source};

/// Everything a generator may touch.
#[derive(Debug, Clone, Copy)]
pub struct GenerateContext<'a> {
    /// Project layout.
    pub project: &'a Project,
    /// Ordinals for resolving conditional expressions.
    pub constants: &'a ConstantTable,
    /// Logger.
    pub log: &'a dyn Log,
}

impl GenerateContext<'_> {
    /// Read the pristine backup of `rel`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Missing`](crate::error::SourceError::Missing)
    /// when the backup has not been created.
    pub fn read_backup(&self, rel: &str) -> Result<String> {
        read_source(&FileBinding::new(self.project, rel).backup)
    }

    /// Write `content` (after the banner) to `rel` under `source/`.
    ///
    /// # Errors
    ///
    /// Returns an error if the staged write cannot be committed.
    pub fn write(&self, rel: &str, content: &str) -> Result<()> {
        self.log.debug(&format!("writing {rel}"));
        write_source(&self.project.source_path(rel), content)
    }
}

/// Regenerates the C owned by one category.
///
/// Backups are guaranteed to exist before [`generate`](Self::generate) runs.
pub trait Generator: Send + Sync {
    /// Emit every generated file and splice every bound file.
    ///
    /// # Errors
    ///
    /// Returns an error when a marker is missing, a value cannot be
    /// rendered, or a write fails. The caller rolls the tree back.
    fn generate(&self, records: &Record, ctx: &GenerateContext<'_>) -> Result<()>;
}
