//! Move ids, description texts and battle data.
use std::collections::BTreeMap;

use anyhow::Result;

use super::{CategoryDef, CategoryKind};
use crate::extract::scan::{DesignatorScanner, parse_define};
use crate::extract::{ExtractContext, Extraction, ExtractionReport, Extractor};
use crate::model::{Record, Value};
use crate::parse::strings::{segments, title_case, unescape};
use crate::parse::{FieldTable, scalar};
use crate::project::Project;
use crate::resources::source_file::read_source;

/// Move id definitions.
pub const MOVES_H: &str = "include/constants/moves.h";
/// Move description texts and their per-move table.
pub const MOVE_DESCRIPTIONS_H: &str = "src/data/text/move_descriptions.h";
/// Config the description table depends on.
pub const BATTLE_CONFIG_H: &str = "include/config/battle.h";
/// Battle data table.
pub const BATTLE_MOVES_H: &str = "src/data/battle_moves.h";

/// Chains longer than this are treated as unresolvable.
const MAX_ALIAS_DEPTH: usize = 16;

crate::static_regex! {
    DESCRIPTION_TEXT = r"^\s*static const u8 (\w+?)\[\]\s*=\s*_\(";
    DESCRIPTION_REF = r"^\s*\[(MOVE_\w+?) - 1\]\s*=\s*(.*?),";
    MOVE_HEADER = r"^\s*\[(MOVE_\w+)\]\s*=";
}

static BATTLE_FIELDS: FieldTable = FieldTable::plain();

/// Reads ids, descriptions and battle data.
#[derive(Debug, Clone, Copy, Default)]
pub struct MovesExtractor;

/// `#define` values of the move header, split into move ids and other
/// constants, before alias resolution.
#[derive(Debug, Default)]
struct Defines {
    moves: Vec<(String, String)>,
    constants: Vec<(String, String)>,
}

fn read_defines(text: &str) -> Defines {
    let mut defines = Defines::default();
    for define in text.lines().filter_map(parse_define) {
        if define.name == "MOVE_UNAVAILABLE" {
            continue;
        }
        if define.name.starts_with("MOVE_") {
            defines.moves.push((define.name, define.value));
        } else {
            defines.constants.push((define.name, define.value));
        }
    }
    defines
}

struct Resolver<'a> {
    moves: BTreeMap<&'a str, &'a str>,
    constants: BTreeMap<&'a str, &'a str>,
}

fn index(pairs: &[(String, String)]) -> BTreeMap<&str, &str> {
    pairs
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect()
}

impl<'a> Resolver<'a> {
    fn new(defines: &'a Defines) -> Self {
        Self {
            moves: index(&defines.moves),
            constants: index(&defines.constants),
        }
    }

    /// Integer value of `text`: literals, `(a + b)` sums and names chained
    /// through other definitions.
    fn resolve(&self, text: &str, depth: usize) -> Option<i64> {
        if depth > MAX_ALIAS_DEPTH {
            return None;
        }
        let text = text.trim();
        let text = text
            .strip_prefix('(')
            .and_then(|t| t.strip_suffix(')'))
            .unwrap_or(text)
            .trim();
        if let Ok(n) = text.parse() {
            return Some(n);
        }
        if let Some((lhs, rhs)) = text.split_once(" + ") {
            return self.resolve(lhs, depth + 1)?.checked_add(self.resolve(rhs, depth + 1)?);
        }
        let next = self.constants.get(text).or_else(|| self.moves.get(text))?;
        self.resolve(next, depth + 1)
    }

    fn value(&self, text: &str) -> Value {
        self.resolve(text, 0)
            .map_or_else(|| scalar(text), Value::Int)
    }
}

/// Move records and constants from the id header.
fn parse_ids(text: &str) -> (Record, Record) {
    let defines = read_defines(text);
    let resolver = Resolver::new(&defines);
    let moves = defines
        .moves
        .iter()
        .map(|(name, value)| {
            let mut record = Record::new();
            record.insert("name", title_case(name.trim_start_matches("MOVE_")));
            record.insert("id", resolver.value(value));
            record.insert("battle_data", Record::new());
            record.insert("contest_data", Record::new());
            record.insert("description_var", "");
            (name.clone(), Value::Record(record))
        })
        .collect();
    let constants = defines
        .constants
        .iter()
        .map(|(name, value)| (name.clone(), resolver.value(value)))
        .collect();
    (moves, constants)
}

/// Description texts keyed by variable, and `description_var` assignments
/// for moves already in `moves`.
fn parse_descriptions(text: &str, moves: &mut Record, report: &mut ExtractionReport) -> Record {
    let mut texts = Record::new();
    let mut open: Option<(String, String)> = None;
    for line in text.lines() {
        if let Some((var, mut acc)) = open.take() {
            let seg = segments(line);
            acc.push_str(&seg.text);
            if seg.closed || line.trim_end().ends_with(");") {
                texts.insert(var, unescape(&acc));
            } else {
                open = Some((var, acc));
            }
            continue;
        }
        if let Some(caps) = DESCRIPTION_TEXT.captures(line)
            && let Some(whole) = caps.get(0)
        {
            let var = caps[1].to_string();
            let seg = segments(line.get(whole.end()..).unwrap_or_default());
            if seg.closed {
                texts.insert(var, unescape(&seg.text));
            } else {
                open = Some((var, seg.text));
            }
            continue;
        }
        if let Some(caps) = DESCRIPTION_REF.captures(line) {
            match moves.record_mut(&caps[1]) {
                Some(record) => {
                    record.insert("description_var", caps[2].trim());
                    report.fields += 1;
                }
                None => report.skipped_lines += 1,
            }
        }
    }
    if let Some((var, acc)) = open {
        texts.insert(var, unescape(&acc));
    }
    texts
}

/// Attach battle table bodies to known moves.
fn attach_battle_data(text: &str, moves: &mut Record, report: &mut ExtractionReport) {
    let scan = DesignatorScanner::new(&MOVE_HEADER, &BATTLE_FIELDS).scan(text);
    report.merge(scan.report);
    for entity in scan.entities {
        if let Some(record) = moves.record_mut(&entity.id) {
            record.insert("battle_data", entity.fields);
        }
    }
}

/// Assemble the moves document from the three inputs.
#[must_use]
pub fn parse_moves(ids: &str, descriptions: &str, battle_moves: &str) -> Extraction {
    let mut report = ExtractionReport::default();
    let (mut moves, constants) = parse_ids(ids);
    let texts = parse_descriptions(descriptions, &mut moves, &mut report);
    attach_battle_data(battle_moves, &mut moves, &mut report);
    report.records = moves.len();

    let mut records = Record::new();
    records.insert("moves", moves);
    records.insert("move_descriptions", texts);
    records.insert("constants", constants);
    Extraction { records, report }
}

impl Extractor for MovesExtractor {
    fn extract(&self, ctx: &ExtractContext<'_>) -> Result<Extraction> {
        let ids = read_source(&ctx.project.source_path(MOVES_H))?;
        let processed = ctx.preprocessor.preprocess(
            ctx.project,
            MOVE_DESCRIPTIONS_H,
            &[BATTLE_CONFIG_H],
            ctx.log,
        )?;
        let descriptions = read_source(&processed)?;
        let battle_moves = read_source(&ctx.project.source_path(BATTLE_MOVES_H))?;
        Ok(parse_moves(&ids, &descriptions, &battle_moves))
    }
}

/// Description text of `move_id`, through its `description_var`.
#[must_use]
pub fn description<'a>(records: &'a Record, move_id: &str) -> Option<&'a str> {
    let var = records
        .get_path(&["moves", move_id, "description_var"])
        .and_then(Value::as_str)?;
    records
        .get_path(&["move_descriptions", var])
        .and_then(Value::as_str)
}

/// The moves category: read-only.
#[must_use]
pub fn category(_project: &Project) -> CategoryDef {
    CategoryDef::read_only(
        CategoryKind::Moves,
        &[MOVES_H, MOVE_DESCRIPTIONS_H, BATTLE_MOVES_H],
        Box::new(MovesExtractor),
    )
}
