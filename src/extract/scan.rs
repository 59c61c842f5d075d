//! Line-oriented scanning of designated-initializer tables.
//!
//! [`DesignatorScanner`] walks a file with an explicit state machine:
//!
//! ```text
//! Seeking ──[IDENT] = ──▶ Body ──.key = COMPOUND_STRING( ──▶ CompoundString
//!    ▲                     │  ▲                                  │
//!    └──────── }, ─────────┘  └───────────── ") ─────────────────┘
//!
//! Seeking/Body ──const u8 x[] = _( ──▶ RawText ──); ──▶ (back)
//! ```
//!
//! Header lines flush the previous entity. Body lines of the form
//! `.key = value,` (several per line allowed) go through a
//! [`ValueParser`]. Anything else is counted as skipped.
use std::collections::BTreeMap;

use regex::Regex;

use crate::model::Record;
use crate::parse::ValueParser;
use crate::parse::strings::{segments, split_top_level};

use super::ExtractionReport;

crate::static_regex! {
    MULTILINE_OPENER = r"^\.(\w+)\s*=\s*(?:COMPOUND_STRING|_)\((.*)$";
    DEFINE = r"^\s*#define\s+(\S+)\s+(.*?)\s*$";
}

/// One entity found by the scanner, fields in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    /// Designator identifier (`SPECIES_BULBASAUR`).
    pub id: String,
    /// Parsed fields.
    pub fields: Record,
}

/// Everything a scan produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanOutput {
    /// Entities in source order.
    pub entities: Vec<Entity>,
    /// Raw-text blocks keyed by variable name, escapes left as written.
    pub raw_texts: BTreeMap<String, String>,
    /// Field and skip accounting. `records` is left to the caller.
    pub report: ExtractionReport,
}

#[derive(Debug)]
enum State {
    Seeking,
    Body,
    CompoundString { key: String, text: String },
    RawText { var: String, text: String },
}

/// Configurable designator-table scanner.
pub struct DesignatorScanner<'a> {
    header: &'a Regex,
    raw_text: Option<(&'a Regex, fn(&str) -> String)>,
    parser: &'a dyn ValueParser,
}

impl std::fmt::Debug for DesignatorScanner<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DesignatorScanner")
            .field("header", &self.header.as_str())
            .finish_non_exhaustive()
    }
}

impl<'a> DesignatorScanner<'a> {
    /// Scan entities whose header matches `header` (group 1 is the id).
    #[must_use]
    pub fn new(header: &'a Regex, parser: &'a dyn ValueParser) -> Self {
        Self {
            header,
            raw_text: None,
            parser,
        }
    }

    /// Also collect raw-text blocks opened by `opener`; `name` maps its
    /// group 1 to the variable name used as the lookup key.
    #[must_use]
    pub fn with_raw_text(mut self, opener: &'a Regex, name: fn(&str) -> String) -> Self {
        self.raw_text = Some((opener, name));
        self
    }

    /// Scan `text`.
    #[must_use]
    pub fn scan(&self, text: &str) -> ScanOutput {
        let mut out = ScanOutput::default();
        let mut state = State::Seeking;
        let mut current: Option<Entity> = None;

        for line in text.lines() {
            state = match state {
                State::RawText { var, mut text } => {
                    let seg = segments(line);
                    text.push_str(&seg.text);
                    if seg.closed || line.trim_end().ends_with(");") {
                        out.raw_texts.insert(var, text);
                        resume(current.as_ref())
                    } else {
                        State::RawText { var, text }
                    }
                }
                State::CompoundString { key, mut text } => {
                    let seg = segments(line);
                    text.push_str(&seg.text);
                    if seg.closed {
                        if let Some(entity) = current.as_mut() {
                            self.store(entity, &key, &text, &mut out.report);
                        }
                        State::Body
                    } else {
                        State::CompoundString { key, text }
                    }
                }
                State::Seeking | State::Body => {
                    self.line(line, &mut current, &mut out)
                }
            };
        }

        if let State::RawText { var, text } = state {
            out.raw_texts.insert(var, text);
        }
        if let Some(entity) = current.take() {
            out.entities.push(entity);
        }
        out
    }

    fn line(&self, line: &str, current: &mut Option<Entity>, out: &mut ScanOutput) -> State {
        if let Some((opener, name)) = self.raw_text
            && let Some(caps) = opener.captures(line)
            && let Some(whole) = caps.get(0)
        {
            let var = name(&caps[1]);
            let rest = line.get(whole.end()..).unwrap_or_default();
            let seg = segments(rest);
            if seg.closed {
                out.raw_texts.insert(var, seg.text);
                return resume(current.as_ref());
            }
            return State::RawText { var, text: seg.text };
        }

        if let Some(caps) = self.header.captures(line)
            && let Some(whole) = caps.get(0)
        {
            if let Some(done) = current.take() {
                out.entities.push(done);
            }
            let mut entity = Entity {
                id: caps[1].to_string(),
                fields: Record::new(),
            };
            let rest = line.get(whole.end()..).unwrap_or_default().trim();
            let closes = rest.ends_with("},") || rest.ends_with('}');
            let inline = rest
                .trim_end_matches(',')
                .trim_end_matches('}')
                .trim_start_matches('{')
                .trim();
            if inline.contains('=') {
                for (key, value) in split_fields(inline) {
                    self.store(&mut entity, &key, &value, &mut out.report);
                }
            }
            if closes && !inline.is_empty() {
                out.entities.push(entity);
                return State::Seeking;
            }
            *current = Some(entity);
            return State::Body;
        }

        if current.is_none() {
            return State::Seeking;
        }
        let trimmed = strip_line_comment(line).trim();
        if trimmed == "}," || trimmed == "}" || trimmed == "};" {
            if let Some(done) = current.take() {
                out.entities.push(done);
            }
            return State::Seeking;
        }
        if let Some(caps) = MULTILINE_OPENER.captures(trimmed) {
            let seg = segments(&caps[2]);
            if !seg.closed {
                return State::CompoundString {
                    key: caps[1].to_string(),
                    text: seg.text,
                };
            }
        }
        if trimmed.starts_with('.')
            && let Some(entity) = current.as_mut()
        {
            let fields = split_fields(trimmed);
            if fields.is_empty() {
                out.report.skipped_lines += 1;
            }
            for (key, value) in fields {
                self.store(entity, &key, &value, &mut out.report);
            }
        } else if !is_structural(trimmed) {
            out.report.skipped_lines += 1;
        }
        State::Body
    }

    fn store(&self, entity: &mut Entity, key: &str, raw: &str, report: &mut ExtractionReport) {
        let field = self.parser.parse(key, raw);
        report.note(&entity.id, &field);
        entity.fields.insert(field.key, field.value);
    }
}

const fn resume(current: Option<&Entity>) -> State {
    if current.is_some() {
        State::Body
    } else {
        State::Seeking
    }
}

fn is_structural(trimmed: &str) -> bool {
    trimmed.is_empty() || trimmed == "{" || trimmed.starts_with('#')
}

/// Split `.a = 1, .b = { X, Y },` into `[("a", "1"), ("b", "{ X, Y }")]`.
///
/// Pieces without `=` or with a non-identifier key are dropped.
#[must_use]
pub fn split_fields(line: &str) -> Vec<(String, String)> {
    let text = line.trim();
    let text = text.strip_prefix('.').unwrap_or(text);
    let text = text.strip_suffix(',').unwrap_or(text);
    split_top_level(text, ", .")
        .into_iter()
        .filter_map(|piece| {
            let (key, value) = piece.split_once('=')?;
            let key = key.trim().trim_start_matches('.');
            let valid = !key.is_empty() && key.chars().all(|c| c.is_alphanumeric() || c == '_');
            valid.then(|| (key.to_string(), value.trim().to_string()))
        })
        .collect()
}

/// Drop a trailing `//` comment that is not inside a string literal.
#[must_use]
pub fn strip_line_comment(line: &str) -> &str {
    comment_start(line).map_or(line, |at| line.get(..at).unwrap_or(line))
}

fn comment_start(line: &str) -> Option<usize> {
    let mut in_quote = false;
    let mut escaped = false;
    let bytes = line.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        if in_quote {
            match b {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_quote = false,
                _ => {}
            }
        } else if b == b'"' {
            in_quote = true;
        } else if b == b'/' && bytes.get(i + 1) == Some(&b'/') {
            return Some(i);
        }
    }
    None
}

/// A `#define NAME value // comment` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Define {
    /// Macro name.
    pub name: String,
    /// Replacement text without the comment.
    pub value: String,
    /// Trailing comment text, empty when absent.
    pub comment: String,
}

/// Parse a `#define` line with a value. Function-like macros are skipped.
#[must_use]
pub fn parse_define(line: &str) -> Option<Define> {
    let caps = DEFINE.captures(line)?;
    let name = caps[1].to_string();
    if name.contains('(') {
        return None;
    }
    let raw = &caps[2];
    let value = strip_line_comment(raw).trim().to_string();
    if value.is_empty() {
        return None;
    }
    let comment = comment_start(raw)
        .and_then(|at| raw.get(at + 2..))
        .map(|c| c.trim().to_string())
        .unwrap_or_default();
    Some(Define {
        name,
        value,
        comment,
    })
}
