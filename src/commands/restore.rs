//! Command: put rewritten sources back and delete generated files.
use anyhow::Result;

use crate::cli::GlobalOpts;
use crate::logging::Logger;

/// Run the restore command.
///
/// # Errors
///
/// Returns an error if setup fails or any file could not be restored.
pub fn run(global: &GlobalOpts, log: &Logger) -> Result<()> {
    let mut setup = super::CommandSetup::init(global, log)?;

    log.stage("Restoring");
    let touched = setup.manager.restore_all(log);
    log.info(&format!("{touched} file(s) restored or removed"));

    super::finish(log)
}
