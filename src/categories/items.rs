//! Item table from `src/data/items.h`.
use anyhow::Result;

use super::{CategoryDef, CategoryKind};
use crate::extract::scan::DesignatorScanner;
use crate::extract::{ExtractContext, Extraction, Extractor};
use crate::model::{Record, Value};
use crate::parse::{FieldTable, fields};
use crate::project::Project;
use crate::resources::source_file::read_source;

/// Item data table.
pub const ITEMS_H: &str = "src/data/items.h";

/// Identifier of the placeholder item.
pub const ITEM_NONE: &str = "ITEM_NONE";

crate::static_regex! {
    ITEM_HEADER = r"^\s*\[(ITEM_\w+)\]\s*=";
}

static ITEM_FIELDS: FieldTable = FieldTable::new(&[
    ("name", fields::localized),
    ("description", fields::description),
]);

/// Reads the item table.
#[derive(Debug, Clone, Copy, Default)]
pub struct ItemsExtractor;

/// Scan the item table into `ITEM_X -> {name, data, id}` records, `id` being
/// the position in the table.
#[must_use]
pub fn parse_items(text: &str) -> Extraction {
    let scan = DesignatorScanner::new(&ITEM_HEADER, &ITEM_FIELDS).scan(text);
    let mut extraction = Extraction {
        records: Record::new(),
        report: scan.report,
    };
    for (id, entity) in (0_i64..).zip(scan.entities) {
        let mut data = entity.fields;
        let name = if entity.id == ITEM_NONE {
            data.remove("name");
            Value::from("None")
        } else {
            data.remove("name").unwrap_or_else(|| Value::from(""))
        };
        let mut item = Record::new();
        item.insert("name", name);
        item.insert("data", data);
        item.insert("id", id);
        extraction.records.insert(entity.id, item);
        extraction.report.records += 1;
    }
    extraction
}

impl Extractor for ItemsExtractor {
    fn extract(&self, ctx: &ExtractContext<'_>) -> Result<Extraction> {
        let text = read_source(&ctx.project.source_path(ITEMS_H))?;
        Ok(parse_items(&text))
    }
}

/// The items category: read-only.
#[must_use]
pub fn category(_project: &Project) -> CategoryDef {
    CategoryDef::read_only(CategoryKind::Items, &[ITEMS_H], Box::new(ItemsExtractor))
}
