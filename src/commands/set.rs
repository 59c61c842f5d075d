//! Command: change one field of a record.
use anyhow::{Result, bail};

use crate::cli::{GlobalOpts, SetOpts};
use crate::logging::Logger;
use crate::model::Value;

/// Parse a command-line value: JSON when it parses as a [`Value`], the raw
/// text as a string otherwise.
#[must_use]
pub fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::from(raw))
}

/// Run the set command.
///
/// Documents are loaded the way `build` loads them, so the edit applies to
/// up-to-date records; only the edited document is saved.
///
/// # Errors
///
/// Returns an error if the category cannot be loaded, the path is invalid or
/// the document cannot be saved.
pub fn run(global: &GlobalOpts, opts: &SetOpts, log: &Logger) -> Result<()> {
    let kind = super::parse_category(&opts.category)?;
    let path = super::split_path(&opts.path);
    if path.is_empty() {
        bail!("empty path");
    }
    let mut setup = super::CommandSetup::init(global, log)?;
    setup.manager.load_all(false, log);

    let value = parse_value(&opts.value);
    let previous = setup.manager.set(kind, &path, value)?;
    if setup.manager.save(kind)? {
        log.info(&format!(
            "{kind}.{}: {} -> {}",
            opts.path,
            previous.map_or_else(|| "(unset)".to_string(), |v| serde_json::to_string(&v).unwrap_or_default()),
            opts.value
        ));
    } else {
        log.info("value unchanged");
    }

    super::finish(log)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_parse_as_json_first() {
        assert_eq!(parse_value("10"), Value::Int(10));
        assert_eq!(parse_value("\"10\""), Value::from("10"));
        assert_eq!(parse_value("SPECIES_MUDKIP"), Value::from("SPECIES_MUDKIP"));
        assert_eq!(
            parse_value("[\"TYPE_WATER\", \"TYPE_GROUND\"]"),
            Value::List(vec![Value::from("TYPE_WATER"), Value::from("TYPE_GROUND")])
        );
    }
}
