//! National and regional dex order.
use anyhow::Result;

use super::{CategoryDef, CategoryKind};
use crate::extract::{ExtractContext, Extraction, Extractor};
use crate::model::Value;
use crate::project::Project;
use crate::resources::source_file::read_source;

/// Dex enum header, preprocessed so disabled species drop out.
pub const POKEDEX_H: &str = "include/constants/pokedex.h";
/// Config deciding which species are enabled.
pub const SPECIES_ENABLED_H: &str = "include/config/species_enabled.h";

crate::static_regex! {
    NATIONAL = r"^\s*(NATIONAL_DEX_\w+?)\s*(?:=[^,]*)?,";
    REGIONAL = r"^\s*(HOENN_DEX_\w+?)\s*(?:=[^,]*)?,";
}

/// Reads both dex orders.
#[derive(Debug, Clone, Copy, Default)]
pub struct PokedexExtractor;

/// Collect `national_dex` and `regional_dex` lists, skipping the `_NONE`
/// placeholders.
#[must_use]
pub fn parse_pokedex(text: &str) -> Extraction {
    let mut national = Vec::new();
    let mut regional = Vec::new();
    for line in text.lines() {
        if let Some(caps) = NATIONAL.captures(line) {
            if &caps[1] != "NATIONAL_DEX_NONE" {
                national.push(Value::from(&caps[1]));
            }
        } else if let Some(caps) = REGIONAL.captures(line)
            && &caps[1] != "HOENN_DEX_NONE"
        {
            regional.push(Value::from(&caps[1]));
        }
    }
    let mut extraction = Extraction::default();
    extraction.report.records = national.len() + regional.len();
    extraction.records.insert("national_dex", national);
    extraction.records.insert("regional_dex", regional);
    extraction
}

impl Extractor for PokedexExtractor {
    fn extract(&self, ctx: &ExtractContext<'_>) -> Result<Extraction> {
        let processed =
            ctx.preprocessor
                .preprocess(ctx.project, POKEDEX_H, &[SPECIES_ENABLED_H], ctx.log)?;
        Ok(parse_pokedex(&read_source(&processed)?))
    }
}

/// The pokedex category. Bound but without a generator: a build only
/// guarantees its backup.
#[must_use]
pub fn category(project: &Project) -> CategoryDef {
    CategoryDef::read_only(CategoryKind::Pokedex, &[POKEDEX_H], Box::new(PokedexExtractor))
        .with_bindings(project, &[POKEDEX_H])
}
