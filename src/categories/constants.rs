//! Grouped Pokémon constants from `include/constants/pokemon.h`.
use anyhow::Result;

use super::{CategoryDef, CategoryKind};
use crate::extract::scan::parse_define;
use crate::extract::{ExtractContext, Extraction, Extractor};
use crate::model::{Record, Value};
use crate::parse::scalar;
use crate::parse::strings::title_case;
use crate::project::Project;
use crate::resources::source_file::read_source;

/// Header holding types, egg groups, natures and the rest.
pub const POKEMON_H: &str = "include/constants/pokemon.h";

/// Constant prefix, the group it lands in and the words dropped from its
/// display name. More specific prefixes come first.
const GROUPS: &[(&str, &str, &str)] = &[
    ("TYPE_", "types", "Type "),
    ("EGG_GROUP_", "egg_groups", "Egg Group "),
    ("NATURE_", "natures", "Nature "),
    ("SPLIT_", "move_splits", "Split "),
    ("GROWTH_", "growth_rates", "Growth "),
    ("BODY_COLOR_", "body_colors", "Body Color "),
    ("EVO_MODE_", "evolution_modes", "Evo Mode "),
    ("EVO_", "evolution_types", "Evo "),
    ("SPECIES_FLAG_", "species_flags", "Species Flag "),
];

/// Scalar constants and their defaults.
const SCALARS: &[(&str, &str, i64)] = &[
    ("SHINY_ODDS", "shiny_odds", 8),
    ("STANDARD_FRIENDSHIP", "standard_friendship", 70),
    ("LEGENDARY_PERFECT_IV_COUNT", "legendary_perfect_iv_count", 3),
];

/// Reads the constant groups.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstantsExtractor;

fn entry(name: String, value: Value, description: String) -> Record {
    let mut record = Record::new();
    record.insert("name", name);
    record.insert("value", value);
    record.insert("description", description);
    record
}

/// Group every `#define` of the header by prefix.
#[must_use]
pub fn parse_constants(text: &str) -> Extraction {
    let mut groups: Vec<Record> = GROUPS.iter().map(|_| Record::new()).collect();
    let mut scalars: Vec<Value> = SCALARS.iter().map(|(_, _, d)| Value::Int(*d)).collect();
    let mut extraction = Extraction::default();

    for define in text.lines().filter_map(parse_define) {
        if define.name == "TYPE_NONE" {
            continue;
        }
        if let Some(i) = SCALARS.iter().position(|(name, _, _)| define.name.starts_with(name))
            && let Some(slot) = scalars.get_mut(i)
        {
            *slot = scalar(&define.value);
            extraction.report.fields += 1;
            continue;
        }
        let Some(i) = GROUPS
            .iter()
            .position(|(prefix, _, _)| define.name.starts_with(prefix))
        else {
            continue;
        };
        let (Some((_, _, drop)), Some(group)) = (GROUPS.get(i), groups.get_mut(i)) else {
            continue;
        };
        let name = title_case(&define.name).replacen(*drop, "", 1);
        group.insert(
            define.name.clone(),
            entry(name, scalar(&define.value), define.comment),
        );
        extraction.report.records += 1;
        extraction.report.fields += 3;
    }

    for ((_, key, _), group) in GROUPS.iter().zip(groups) {
        extraction.records.insert(*key, group);
    }
    for ((_, key, _), value) in SCALARS.iter().zip(scalars) {
        extraction.records.insert(*key, value);
    }
    extraction
}

impl Extractor for ConstantsExtractor {
    fn extract(&self, ctx: &ExtractContext<'_>) -> Result<Extraction> {
        let text = read_source(&ctx.project.source_path(POKEMON_H))?;
        Ok(parse_constants(&text))
    }
}

/// The constants category: read-only.
#[must_use]
pub fn category(_project: &Project) -> CategoryDef {
    CategoryDef::read_only(
        CategoryKind::Constants,
        &[POKEMON_H],
        Box::new(ConstantsExtractor),
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const HEADER: &str = "\
#define TYPE_NONE 255
#define TYPE_NORMAL 0
#define TYPE_FIRE 10 // hot
#define EGG_GROUP_MONSTER 1
#define EVO_MODE_NORMAL 0
#define EVO_LEVEL 4
#define SHINY_ODDS 16 // Actual probability is SHINY_ODDS/65536
#define SPECIES_FLAG_LEGENDARY (1 << 0)
";

    #[test]
    fn defines_are_grouped_by_prefix() {
        let records = parse_constants(HEADER).records;
        let types = records.record("types").unwrap();
        assert_eq!(types.len(), 2);
        let fire = types.record("TYPE_FIRE").unwrap();
        assert_eq!(fire.get("name"), Some(&Value::from("Fire")));
        assert_eq!(fire.get("value"), Some(&Value::Int(10)));
        assert_eq!(fire.get("description"), Some(&Value::from("hot")));

        let modes = records.record("evolution_modes").unwrap();
        assert!(modes.contains_key("EVO_MODE_NORMAL"));
        let evos = records.record("evolution_types").unwrap();
        assert_eq!(evos.keys().collect::<Vec<_>>(), ["EVO_LEVEL"]);
        assert_eq!(
            evos.record("EVO_LEVEL").unwrap().get("name"),
            Some(&Value::from("Level"))
        );
    }

    #[test]
    fn scalars_keep_defaults_unless_defined() {
        let records = parse_constants(HEADER).records;
        assert_eq!(records.get("shiny_odds"), Some(&Value::Int(16)));
        assert_eq!(records.get("standard_friendship"), Some(&Value::Int(70)));
        assert_eq!(records.get("legendary_perfect_iv_count"), Some(&Value::Int(3)));
        assert_eq!(
            records
                .record("species_flags")
                .and_then(|f| f.record("SPECIES_FLAG_LEGENDARY"))
                .and_then(|f| f.get("value")),
            Some(&Value::from("(1 << 0)"))
        );
    }
}
