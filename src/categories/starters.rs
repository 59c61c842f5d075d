//! Starter choices: the `sStarterMon` array and the per-slot give-mon code
//! in `CB2_GiveStarter`.
use anyhow::Result;

use super::{CategoryDef, CategoryKind};
use crate::codegen::splice::{Edit, Marker, edit_line, splice_region};
use crate::codegen::{GenerateContext, Generator};
use crate::extract::{ExtractContext, Extraction, ExtractionReport, Extractor};
use crate::model::{Record, Value};
use crate::parse::scalar;
use crate::project::Project;
use crate::resources::source_file::read_source;

/// File declaring the starter species array.
pub const STARTER_CHOOSE_C: &str = "src/starter_choose.c";
/// File containing `CB2_GiveStarter`.
pub const BATTLE_SETUP_C: &str = "src/battle_setup.c";

const ARRAY_MARKER: &str = "const u16 sStarterMon";
const FUNCTION_MARKER: &str = "static void CB2_GiveStarter(void)";
const STARTER_DECL: &str = "u16 starterMon";
const GIVE_MON: &str = "ScriptGiveMon(starterMon";

/// Level given when nothing else is recorded.
pub const DEFAULT_LEVEL: i64 = 5;
/// Placeholder for "no held item".
pub const NO_ITEM: &str = "ITEM_NONE";
/// Placeholder for "no extra move".
pub const NO_MOVE: &str = "MOVE_NONE";
/// Ability number meaning "keep the species default".
pub const DEFAULT_ABILITY_NUM: i64 = -1;
/// Fields of a starter record.
pub const FIELDS: &[&str] = &["species", "level", "item", "custom_move", "ability_num"];

crate::static_regex! {
    STARTER_ENTRY = r"^\s*(SPECIES_\w+),";
    CASE = r"^\s*case\s+(\d+)\s*:";
    GIVE_MON_CALL = r"ScriptGiveMon\(starterMon,\s*(\d+),\s*(\w+)";
    GIVE_MOVE_CALL = r"GiveMoveToMon\(&gPlayerParty\[0\],\s*(\w+)\)";
    ABILITY_NUM = r"abilityNum\s*=\s*(-?\d+);";
}

fn starter(species: &str) -> Record {
    let mut record = Record::new();
    record.insert("species", species);
    record.insert("level", DEFAULT_LEVEL);
    record.insert("item", NO_ITEM);
    record.insert("custom_move", NO_MOVE);
    record.insert("ability_num", DEFAULT_ABILITY_NUM);
    record
}

/// Starter species in array order, keyed by slot.
#[must_use]
pub fn parse_starter_array(text: &str) -> Record {
    let mut records = Record::new();
    let mut inside = false;
    for line in text.lines() {
        if line.contains(ARRAY_MARKER) {
            inside = true;
            continue;
        }
        if !inside {
            continue;
        }
        if line.contains('}') {
            break;
        }
        if let Some(caps) = STARTER_ENTRY.captures(line) {
            records.insert(records.len().to_string(), starter(&caps[1]));
        }
    }
    records
}

/// Overlay the per-slot settings found in `CB2_GiveStarter`'s switch.
pub fn apply_give_starter(text: &str, starters: &mut Record) {
    let mut inside = false;
    let mut slot: Option<String> = None;
    for line in text.lines() {
        if line.starts_with(FUNCTION_MARKER) {
            inside = true;
            continue;
        }
        if !inside {
            continue;
        }
        if line.starts_with('}') {
            break;
        }
        if let Some(caps) = CASE.captures(line) {
            slot = Some(caps[1].to_string());
            continue;
        }
        let Some(record) = slot.as_deref().and_then(|s| starters.record_mut(s)) else {
            continue;
        };
        if let Some(caps) = GIVE_MON_CALL.captures(line) {
            record.insert("level", scalar(&caps[1]));
            record.insert("item", &caps[2]);
        } else if let Some(caps) = GIVE_MOVE_CALL.captures(line) {
            record.insert("custom_move", &caps[1]);
        } else if let Some(caps) = ABILITY_NUM.captures(line) {
            record.insert("ability_num", scalar(&caps[1]));
        }
    }
}

/// Reads starter species and their give-mon settings.
#[derive(Debug, Clone, Copy, Default)]
pub struct StartersExtractor;

impl Extractor for StartersExtractor {
    fn extract(&self, ctx: &ExtractContext<'_>) -> Result<Extraction> {
        let array = read_source(&ctx.project.source_path(STARTER_CHOOSE_C))?;
        let mut records = parse_starter_array(&array);
        let setup = read_source(&ctx.project.source_path(BATTLE_SETUP_C))?;
        apply_give_starter(&setup, &mut records);

        let report = ExtractionReport {
            records: records.len(),
            fields: records.len() * 5,
            ..ExtractionReport::default()
        };
        Ok(Extraction { records, report })
    }
}

fn text_field<'a>(record: &'a Record, key: &str, default: &'a str) -> &'a str {
    record.get(key).and_then(Value::as_str).unwrap_or(default)
}

fn int_field(record: &Record, key: &str, default: i64) -> i64 {
    record.get(key).and_then(Value::to_int).unwrap_or(default)
}

fn starters(records: &Record) -> impl Iterator<Item = (&str, &Record)> {
    records
        .iter()
        .filter_map(|(slot, value)| value.as_record().map(|record| (slot, record)))
}

/// Body of `sStarterMon`: one `SPECIES_X,` per starter.
#[must_use]
pub fn array_body(records: &Record) -> Vec<String> {
    starters(records)
        .map(|(_, starter)| format!("    {},", text_field(starter, "species", "SPECIES_NONE")))
        .collect()
}

/// The `switch` that replaces the single give-mon call.
#[must_use]
pub fn switch_block(records: &Record) -> Vec<String> {
    let mut lines = vec![
        "    switch(gSpecialVar_Result)".to_string(),
        "    {".to_string(),
    ];
    for (slot, starter) in starters(records) {
        let species = text_field(starter, "species", "SPECIES_NONE");
        lines.push(format!("        case {slot}: // {species}"));
        lines.push(format!(
            "            ScriptGiveMon(starterMon, {}, {}, 0, 0, 0);",
            int_field(starter, "level", DEFAULT_LEVEL),
            text_field(starter, "item", NO_ITEM)
        ));
        let custom_move = text_field(starter, "custom_move", NO_MOVE);
        if custom_move != NO_MOVE {
            lines.push(format!(
                "            GiveMoveToMon(&gPlayerParty[0], {custom_move});"
            ));
        }
        let ability_num = int_field(starter, "ability_num", DEFAULT_ABILITY_NUM);
        if ability_num != DEFAULT_ABILITY_NUM {
            lines.push(format!("            abilityNum = {ability_num};"));
            lines.push(
                "            SetMonData(&gPlayerParty[0], MON_DATA_ABILITY_NUM, &abilityNum);"
                    .to_string(),
            );
        }
        lines.push("            break;".to_string());
    }
    lines.push("    }".to_string());
    lines
}

fn needs_ability_num(records: &Record) -> bool {
    starters(records)
        .any(|(_, starter)| int_field(starter, "ability_num", DEFAULT_ABILITY_NUM) != DEFAULT_ABILITY_NUM)
}

/// Splice both starter files from their backups.
#[derive(Debug, Clone, Copy, Default)]
pub struct StartersGenerator;

impl StartersGenerator {
    /// Rewrite `starter_choose.c` text.
    ///
    /// # Errors
    ///
    /// Returns [`MarkerNotFound`](crate::error::GenerationError::MarkerNotFound)
    /// when the array cannot be located.
    pub fn starter_choose(backup: &str, records: &Record) -> Result<String> {
        splice_region(
            backup,
            STARTER_CHOOSE_C,
            &[Marker::Contains(ARRAY_MARKER), Marker::TrimmedStartsWith("{")],
            &Marker::Contains("}"),
            &array_body(records),
        )
    }

    /// Rewrite `battle_setup.c` text.
    ///
    /// # Errors
    ///
    /// Returns [`MarkerNotFound`](crate::error::GenerationError::MarkerNotFound)
    /// when `CB2_GiveStarter` or its give-mon call cannot be located.
    pub fn battle_setup(backup: &str, records: &Record) -> Result<String> {
        let scope = Marker::StartsWith(FUNCTION_MARKER);
        let switch = switch_block(records);
        let text = edit_line(
            backup,
            BATTLE_SETUP_C,
            &scope,
            &Marker::Contains(GIVE_MON),
            Edit::Replace(&switch),
        )?;
        if !needs_ability_num(records) {
            return Ok(text);
        }
        edit_line(
            &text,
            BATTLE_SETUP_C,
            &scope,
            &Marker::Contains(STARTER_DECL),
            Edit::Append(&["    u16 abilityNum;".to_string()]),
        )
    }
}

impl Generator for StartersGenerator {
    fn generate(&self, records: &Record, ctx: &GenerateContext<'_>) -> Result<()> {
        let choose = Self::starter_choose(&ctx.read_backup(STARTER_CHOOSE_C)?, records)?;
        let setup = Self::battle_setup(&ctx.read_backup(BATTLE_SETUP_C)?, records)?;
        ctx.write(STARTER_CHOOSE_C, &choose)?;
        ctx.write(BATTLE_SETUP_C, &setup)?;
        Ok(())
    }
}

/// The starters category: both files spliced.
#[must_use]
pub fn category(project: &Project) -> CategoryDef {
    CategoryDef::read_only(
        CategoryKind::Starters,
        &[STARTER_CHOOSE_C, BATTLE_SETUP_C],
        Box::new(StartersExtractor),
    )
    .with_bindings(project, &[STARTER_CHOOSE_C, BATTLE_SETUP_C])
    .with_generator(Box::new(StartersGenerator))
}
