//! Command: print a record as JSON.
use anyhow::{Context as _, Result, bail};

use crate::cli::{GlobalOpts, ShowOpts};
use crate::logging::Logger;
use crate::model::Record;
use crate::store::to_json;

/// Run the show command.
///
/// # Errors
///
/// Returns an error if the category has no document or the path does not
/// exist.
pub fn run(global: &GlobalOpts, opts: &ShowOpts, log: &Logger) -> Result<()> {
    let kind = super::parse_category(&opts.category)?;
    let mut setup = super::CommandSetup::init(global, log)?;
    setup.manager.open_documents(log);

    let Some(records) = setup.manager.records(kind) else {
        bail!("no {kind} document; run `porysync extract` first");
    };
    let json = match opts.path.as_deref().map(super::split_path) {
        None => to_json(records)?,
        Some(path) if path.is_empty() => to_json(records)?,
        Some(path) => {
            let value = records
                .get_path(&path)
                .with_context(|| format!("{kind} has no '{}'", path.join(".")))?;
            let mut wrapped = Record::new();
            wrapped.insert(path.join("."), value.clone());
            to_json(&wrapped)?
        }
    };
    print!("{json}");
    Ok(())
}
