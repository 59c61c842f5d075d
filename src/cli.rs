//! Command-line definition.
use clap::{Parser, Subcommand};

/// Top-level CLI entry point for the decomp data sync engine.
#[derive(Parser, Debug)]
#[command(
    name = "porysync",
    about = "Bidirectional sync between decomp C sources and JSON records",
    version
)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Options shared by every subcommand.
    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone)]
pub struct GlobalOpts {
    /// Override the project root directory
    #[arg(long, global = true)]
    pub root: Option<std::path::PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Extract C sources into the canonical documents
    Extract(ExtractOpts),
    /// Regenerate C sources from the canonical documents
    Build(BuildOpts),
    /// Put every rewritten source back and delete generated files
    Restore,
    /// Show per-category trigger state
    Status,
    /// Print a record as JSON
    Show(ShowOpts),
    /// Change one field of a record
    Set(SetOpts),
    /// Print version information
    Version,
}

impl Command {
    /// Name used for the log file.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Extract(_) => "extract",
            Self::Build(_) => "build",
            Self::Restore => "restore",
            Self::Status => "status",
            Self::Show(_) => "show",
            Self::Set(_) => "set",
            Self::Version => "version",
        }
    }
}

/// Options for the `extract` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct ExtractOpts {
    /// Extract even when the documents are up to date
    #[arg(short, long)]
    pub force: bool,
}

/// Options for the `build` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct BuildOpts {
    /// Report what would be regenerated without writing
    #[arg(short = 'd', long)]
    pub dry_run: bool,
}

/// Options for the `show` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct ShowOpts {
    /// Category id (species, abilities, items, constants, starters, moves, pokedex)
    pub category: String,
    /// Dot-separated path inside the document
    pub path: Option<String>,
}

/// Options for the `set` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct SetOpts {
    /// Category id
    pub category: String,
    /// Dot-separated path inside the document
    pub path: String,
    /// New value, parsed as JSON or taken as a string
    pub value: String,
}
