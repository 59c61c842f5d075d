//! Domain-specific error types for the sync engine.
//!
//! Internal modules raise typed errors (e.g. [`CommandError`],
//! [`GenerationError`]) and propagate them through [`anyhow::Error`] so
//! callers can still `downcast_ref` to the concrete failure.
//!
//! # Error hierarchy
//!
//! ```text
//! SyncError
//! ├── Source(SourceError)         missing or unreadable source files
//! ├── Command(CommandError)       external preprocessor failures
//! ├── Generation(GenerationError) C emission and splice failures
//! ├── Store(StoreError)           canonical document persistence
//! └── Config(ConfigError)         project configuration
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the sync engine.
#[derive(Error, Debug)]
pub enum SyncError {
    /// A source or backup file could not be read.
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// The external command runner failed.
    #[error("Command error: {0}")]
    Command(#[from] CommandError),

    /// Code generation failed.
    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),

    /// The canonical document could not be loaded or persisted.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// The project configuration is invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors raised while reading tracked source files.
#[derive(Error, Debug)]
pub enum SourceError {
    /// An expected original or backup file is absent.
    #[error("missing source file: {}", path.display())]
    Missing {
        /// Absolute path that was expected to exist.
        path: PathBuf,
    },

    /// The file exists but could not be read or written.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// Path of the file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Errors reported by the external command runner.
#[derive(Error, Debug)]
pub enum CommandError {
    /// The program could not be started at all.
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        /// Program name.
        program: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The program ran but reported failure.
    #[error("{program} exited with code {code}")]
    Failed {
        /// Program name.
        program: String,
        /// Exit code (`-1` when terminated by a signal).
        code: i32,
        /// Captured output lines.
        output: Vec<String>,
    },

    /// The program succeeded but its expected output never appeared.
    #[error("expected output was not produced: {}", path.display())]
    OutputMissing {
        /// Path the output was expected at.
        path: PathBuf,
    },
}

/// Errors raised while emitting or splicing C source.
#[derive(Error, Debug)]
pub enum GenerationError {
    /// A managed region's delimiter was not found in the backup copy.
    #[error("marker '{marker}' not found in {file}")]
    MarkerNotFound {
        /// Source-relative path of the file being spliced.
        file: String,
        /// Literal marker that was searched for.
        marker: String,
    },

    /// A recorded value has no C rendering for the given field.
    #[error("cannot render field '{field}' of {entity}: {reason}")]
    Unrenderable {
        /// Identifier of the record being rendered.
        entity: String,
        /// Field name.
        field: String,
        /// What was wrong with the value.
        reason: String,
    },

    /// Generation failed twice, the second time from a freshly restored tree.
    #[error("regeneration of '{category}' failed after restore: {reason}")]
    Fatal {
        /// Category identifier.
        category: String,
        /// Rendered cause of the second failure.
        reason: String,
    },
}

/// Errors raised by the record store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The canonical document could not be read or written.
    #[error("I/O error on document {}: {source}", path.display())]
    Io {
        /// Path to the document.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The canonical document is not valid JSON for the record model.
    #[error("invalid document {}: {source}", path.display())]
    Parse {
        /// Path to the document.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },
}

/// Errors raised while loading `porysync.toml`.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// An unknown category id was listed.
    #[error("unknown category '{0}'")]
    UnknownCategory(String),

    /// The configuration file is not valid TOML.
    #[error("invalid TOML in {file}: {message}")]
    InvalidSyntax {
        /// Path to the file.
        file: String,
        /// Parser message.
        message: String,
    },
}
