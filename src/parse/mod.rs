//! Per-field value coercion.
//!
//! Every raw value pulled out of a designator body goes through the same
//! chain:
//!
//! 1. integer coercion, unless the field's named parser reads the integer
//!    as an empty list (the flag union `0`),
//! 2. constant folding of fully literal ternaries,
//! 3. the field's named parser, when the category registers one,
//! 4. conditional decomposition of every resulting scalar or list element.
//!
//! Nothing in the chain fails. Text no step understands is kept as a string,
//! and the [`Outcome`] says which path the value took so extraction reports
//! can surface fields that fell back to their literal.
pub mod fields;
pub mod strings;

use crate::expr::{conditional, literal};
use crate::model::Value;

/// How a raw value was turned into a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Coerced, folded or handled by a named parser.
    Parsed,
    /// No parser applies; kept as its literal text.
    Verbatim,
    /// A named parser exists but rejected the text; kept as its literal.
    Fallback,
}

/// Result of parsing one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldOutcome {
    /// Field name.
    pub key: String,
    /// Parsed value.
    pub value: Value,
    /// Which path produced `value`.
    pub outcome: Outcome,
}

/// A named parser. Returns `None` when the text is not in the expected shape.
pub type FieldParser = fn(&str) -> Option<Value>;

/// Field-name keyed value parsing for one category.
pub trait ValueParser: Send + Sync {
    /// Parse `raw` as the value of field `key`.
    fn parse(&self, key: &str, raw: &str) -> FieldOutcome;
}

/// A static table of named parsers.
#[derive(Debug, Clone, Copy)]
pub struct FieldTable {
    parsers: &'static [(&'static str, FieldParser)],
}

impl FieldTable {
    /// Wrap a `(field, parser)` table.
    #[must_use]
    pub const fn new(parsers: &'static [(&'static str, FieldParser)]) -> Self {
        Self { parsers }
    }

    /// A table without named parsers; only the universal steps apply.
    #[must_use]
    pub const fn plain() -> Self {
        Self { parsers: &[] }
    }

    fn lookup(&self, key: &str) -> Option<FieldParser> {
        self.parsers
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, parser)| *parser)
    }
}

impl ValueParser for FieldTable {
    fn parse(&self, key: &str, raw: &str) -> FieldOutcome {
        let raw = raw.trim();
        let (value, outcome) = if let Ok(n) = raw.parse::<i64>() {
            match self.lookup(key).and_then(|parser| parser(raw)) {
                Some(Value::List(items)) if items.is_empty() => {
                    (Value::List(items), Outcome::Parsed)
                }
                _ => (Value::Int(n), Outcome::Parsed),
            }
        } else if let Some(n) = literal::fold(raw) {
            (Value::Int(n), Outcome::Parsed)
        } else if let Some(parser) = self.lookup(key) {
            parser(raw).map_or_else(
                || (Value::from(raw), Outcome::Fallback),
                |value| (value, Outcome::Parsed),
            )
        } else {
            (Value::from(raw), Outcome::Verbatim)
        };

        let (value, decomposed) = decompose_conditionals(value);
        let outcome = if decomposed { Outcome::Parsed } else { outcome };
        FieldOutcome {
            key: key.to_string(),
            value,
            outcome,
        }
    }
}

/// Replace string scalars (and string list elements) that hold a symbolic
/// ternary with a structured conditional. Returns whether anything changed.
fn decompose_conditionals(value: Value) -> (Value, bool) {
    match value {
        Value::Str(text) => match conditional::decompose(&text) {
            Some(expr) => (Value::Conditional(expr), true),
            None => (Value::Str(text), false),
        },
        Value::List(items) => {
            let mut changed = false;
            let items = items
                .into_iter()
                .map(|item| {
                    let (item, hit) = decompose_conditionals(item);
                    changed |= hit;
                    item
                })
                .collect();
            (Value::List(items), changed)
        }
        other => (other, false),
    }
}

/// Coerce a bare token: integers become [`Value::Int`], anything else a
/// trimmed string.
#[must_use]
pub fn scalar(text: &str) -> Value {
    let text = text.trim();
    text.parse::<i64>()
        .map_or_else(|_| Value::from(text), Value::Int)
}
