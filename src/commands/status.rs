//! Command: per-category trigger state.
use anyhow::Result;

use crate::cli::GlobalOpts;
use crate::logging::Logger;
use crate::manager::CategoryStatus;

fn flag(set: bool, label: &str) -> &str {
    if set { label } else { "-" }
}

/// One status line.
#[must_use]
pub fn format_status(status: &CategoryStatus) -> String {
    format!(
        "{:<10} {:>6} records  {:<5} {:<7} {}",
        status.kind.id(),
        status.records,
        flag(status.dirty, "dirty"),
        flag(status.extraction_due, "extract"),
        flag(status.regeneration_due, "build"),
    )
}

/// Run the status command. Documents are read but never extracted.
///
/// # Errors
///
/// Returns an error if setup fails or a document cannot be read.
pub fn run(global: &GlobalOpts, log: &Logger) -> Result<()> {
    let mut setup = super::CommandSetup::init(global, log)?;
    setup.manager.open_documents(log);

    log.stage("Status");
    for status in setup.manager.status() {
        log.info(&format_status(&status));
    }

    let count = log.failure_count();
    if count > 0 {
        anyhow::bail!("{count} document(s) could not be read");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categories::CategoryKind;

    #[test]
    fn status_line_layout() {
        let line = format_status(&CategoryStatus {
            kind: CategoryKind::Starters,
            records: 3,
            dirty: false,
            extraction_due: false,
            regeneration_due: true,
        });
        insta::assert_snapshot!(line, @"starters        3 records  -     -       build");
    }
}
