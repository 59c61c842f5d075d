//! Command: extract C sources into the canonical documents.
use anyhow::Result;

use crate::cli::{ExtractOpts, GlobalOpts};
use crate::logging::Logger;

/// Run the extract command.
///
/// # Errors
///
/// Returns an error if setup fails or any category failed to extract or
/// persist.
pub fn run(global: &GlobalOpts, opts: &ExtractOpts, log: &Logger) -> Result<()> {
    let mut setup = super::CommandSetup::init(global, log)?;

    log.stage("Extracting");
    setup.manager.load_all(opts.force, log);
    let written = setup.manager.persist_all(log);
    log.debug(&format!("{written} document(s) written"));

    super::finish(log)
}
