//! Ability ids from `#define ABILITY_<X> <id>`.
use anyhow::Result;

use super::{CategoryDef, CategoryKind};
use crate::extract::scan::parse_define;
use crate::extract::{ExtractContext, Extraction, Extractor};
use crate::model::{Record, Value};
use crate::parse::strings::title_case;
use crate::project::Project;
use crate::resources::source_file::read_source;

/// Header declaring every ability id.
pub const ABILITIES_H: &str = "include/constants/abilities.h";

/// Reads the ability id table.
#[derive(Debug, Clone, Copy, Default)]
pub struct AbilitiesExtractor;

/// Turn the ability header into `ABILITY_X -> {name, id}` records.
///
/// Definitions whose value is not an integer (counts, aliases) are skipped.
#[must_use]
pub fn parse_abilities(text: &str) -> Extraction {
    let mut extraction = Extraction::default();
    for line in text.lines() {
        let Some(define) = parse_define(line) else {
            continue;
        };
        let Some(suffix) = define.name.strip_prefix("ABILITY_") else {
            continue;
        };
        let Ok(id) = define.value.parse::<i64>() else {
            extraction.report.skipped_lines += 1;
            continue;
        };
        let mut ability = Record::new();
        ability.insert("name", title_case(suffix));
        ability.insert("id", id);
        extraction.records.insert(define.name, ability);
        extraction.report.records += 1;
        extraction.report.fields += 2;
    }
    extraction
}

impl Extractor for AbilitiesExtractor {
    fn extract(&self, ctx: &ExtractContext<'_>) -> Result<Extraction> {
        let text = read_source(&ctx.project.source_path(ABILITIES_H))?;
        Ok(parse_abilities(&text))
    }
}

/// Find the ability constant whose id is `id`.
#[must_use]
pub fn by_id(records: &Record, id: i64) -> Option<&str> {
    records
        .iter()
        .find(|(_, ability)| {
            ability
                .as_record()
                .and_then(|a| a.get("id"))
                .and_then(Value::as_int)
                == Some(id)
        })
        .map(|(name, _)| name)
}

/// The abilities category: read-only.
#[must_use]
pub fn category(_project: &Project) -> CategoryDef {
    CategoryDef::read_only(
        CategoryKind::Abilities,
        &[ABILITIES_H],
        Box::new(AbilitiesExtractor),
    )
}
