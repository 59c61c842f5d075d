//! Command: regenerate C sources from the canonical documents.
use anyhow::Result;

use crate::cli::{BuildOpts, GlobalOpts};
use crate::logging::Logger;

/// Run the build command.
///
/// Documents are loaded (extracting where due) and persisted before any
/// category regenerates. With `--dry-run` nothing is written.
///
/// # Errors
///
/// Returns an error if setup fails or any category failed.
pub fn run(global: &GlobalOpts, opts: &BuildOpts, log: &Logger) -> Result<()> {
    let mut setup = super::CommandSetup::init(global, log)?;

    log.stage("Loading");
    if opts.dry_run {
        setup.manager.open_documents(log);
    } else {
        setup.manager.load_all(false, log);
        setup.manager.persist_all(log);
    }

    log.stage("Regenerating");
    let count = setup.manager.regenerate_all(opts.dry_run, log);
    if count == 0 {
        log.info("everything is up to date");
    }

    super::finish(log)
}
