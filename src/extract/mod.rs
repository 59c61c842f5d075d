//! Extraction of canonical records from (preprocessed) C source.
pub mod scan;

use anyhow::Result;

use crate::logging::Log;
use crate::model::Record;
use crate::parse::{FieldOutcome, Outcome};
use crate::preprocess::Preprocessor;
use crate::project::Project;

/// Everything an extractor may touch.
#[derive(Debug, Clone, Copy)]
pub struct ExtractContext<'a> {
    /// Project layout.
    pub project: &'a Project,
    /// External preprocessor.
    pub preprocessor: &'a Preprocessor,
    /// Logger.
    pub log: &'a dyn Log,
}

/// One field whose named parser rejected its text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fallback {
    /// Entity identifier.
    pub entity: String,
    /// Field name.
    pub key: String,
    /// Literal text kept in the record.
    pub raw: String,
}

/// What an extraction pass kept and what it dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionReport {
    /// Records produced.
    pub records: usize,
    /// Fields parsed into those records.
    pub fields: usize,
    /// Fields kept as literal text after their parser rejected them.
    pub fallbacks: Vec<Fallback>,
    /// Lines inside an entity body that matched no recognised shape.
    pub skipped_lines: usize,
}

impl ExtractionReport {
    /// Account for one parsed field of `entity`.
    pub fn note(&mut self, entity: &str, field: &FieldOutcome) {
        self.fields += 1;
        if field.outcome == Outcome::Fallback {
            self.fallbacks.push(Fallback {
                entity: entity.to_string(),
                key: field.key.clone(),
                raw: field.value.as_str().unwrap_or_default().to_string(),
            });
        }
    }

    /// Fold another report into this one.
    pub fn merge(&mut self, other: Self) {
        self.records += other.records;
        self.fields += other.fields;
        self.fallbacks.extend(other.fallbacks);
        self.skipped_lines += other.skipped_lines;
    }

    /// Log totals at info and every fallback at debug.
    pub fn log(&self, category: &str, log: &dyn Log) {
        log.info(&format!(
            "{category}: {} records, {} fields, {} fallbacks, {} skipped lines",
            self.records,
            self.fields,
            self.fallbacks.len(),
            self.skipped_lines
        ));
        for fallback in &self.fallbacks {
            log.debug(&format!(
                "{category}: {}.{} kept as literal: {}",
                fallback.entity, fallback.key, fallback.raw
            ));
        }
    }
}

/// Result of one extraction pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    /// The canonical document contents.
    pub records: Record,
    /// Observability for dropped or literal fields.
    pub report: ExtractionReport,
}

/// Produces the canonical document of one category from source.
pub trait Extractor: Send + Sync {
    /// Run the extraction.
    ///
    /// Structurally unexpected input yields incomplete records rather than
    /// an error.
    ///
    /// # Errors
    ///
    /// Returns an error when a required input is missing or the external
    /// preprocessor fails.
    fn extract(&self, ctx: &ExtractContext<'_>) -> Result<Extraction>;
}
