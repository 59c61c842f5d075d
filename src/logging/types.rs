//! Summary entries and the [`Log`] trait.
use std::fmt;

/// Engine phase a summary entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Phase {
    /// Preprocess and scan sources into a document.
    Extract,
    /// Read an existing document without extracting.
    Load,
    /// Save a dirty document.
    Persist,
    /// Regenerate C sources from a document.
    Build,
    /// Put originals back from their backups.
    Restore,
}

impl Phase {
    /// Lowercase verb used in stage headers and summary groups.
    #[must_use]
    pub const fn verb(self) -> &'static str {
        match self {
            Self::Extract => "extract",
            Self::Load => "load",
            Self::Persist => "persist",
            Self::Build => "build",
            Self::Restore => "restore",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.verb())
    }
}

/// Outcome of one phase for one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepEntry {
    /// Phase the step ran in.
    pub phase: Phase,
    /// Category id (`species`, `starters`, …).
    pub category: String,
    /// Final status.
    pub status: StepStatus,
    /// Skip reason, file count or error chain.
    pub message: Option<String>,
}

impl StepEntry {
    /// `<phase> <category>`, as shown in stage headers.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} {}", self.phase, self.category)
    }
}

/// Status of a completed step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    /// Files or documents were written.
    Done,
    /// No trigger held; nothing changed.
    Unchanged,
    /// Not attempted, or the previous document was kept.
    Skipped,
    /// Would have run; nothing was written.
    DryRun,
    /// Failed.
    Failed,
}

/// Logging backend the engine writes through.
///
/// Tests substitute an isolated logger; the CLI prints the collected steps
/// at the end of a command.
pub trait Log: Send + Sync {
    /// Log a stage header.
    fn stage(&self, msg: &str);
    /// Log an informational message.
    fn info(&self, msg: &str);
    /// Log a debug message (may be suppressed on console).
    fn debug(&self, msg: &str);
    /// Log a warning message.
    fn warn(&self, msg: &str);
    /// Log an error message.
    fn error(&self, msg: &str);
    /// Log what a dry run would have done.
    fn dry_run(&self, msg: &str);
    /// Record the outcome of `phase` for `category`.
    fn record_step(&self, phase: Phase, category: &str, status: StepStatus, message: Option<&str>);
}

impl fmt::Debug for dyn Log + '_ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("dyn Log")
    }
}
