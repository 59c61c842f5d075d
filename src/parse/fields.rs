//! Named parsers shared by the category field tables.
use crate::model::{Record, Value};

use super::scalar;
use super::strings::{segments, split_top_level, unescape};

crate::static_regex! {
    LOCALIZED = r#"^_\(\s*"(.*)"\s*\)$"#;
    COORDS_SIZE = r"^MON_COORDS_SIZE\(\s*([^,]+?)\s*,\s*([^)]+?)\s*\)$";
    PERCENT_RATIO = r"^min\(\s*254\s*,\s*\(*\s*(\d+(?:\.\d+)?)\s*\*\s*255\s*\)\s*/\s*100\s*\)*$";
    EVOLUTION_GROUP = r"\{([^{}]*)\}";
}

/// Male-only gender ratio.
pub const MON_MALE: i64 = 0;
/// Female-only gender ratio.
pub const MON_FEMALE: i64 = 254;
/// Genderless ratio.
pub const MON_GENDERLESS: i64 = 255;
/// Value of `STANDARD_FRIENDSHIP`.
pub const STANDARD_FRIENDSHIP: i64 = 70;
/// Evolution list terminator, dropped on extraction.
pub const EVOLUTIONS_END: &str = "EVOLUTIONS_END";

/// `{A, B}` to an ordered list of trimmed tokens.
#[must_use]
pub fn brace_list(raw: &str) -> Option<Value> {
    let inner = raw.trim().strip_prefix('{')?.strip_suffix('}')?.trim();
    if inner.is_empty() {
        return Some(Value::List(Vec::new()));
    }
    Some(Value::List(
        split_top_level(inner, ",")
            .into_iter()
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(scalar)
            .collect(),
    ))
}

/// `_("text")` to `text`.
#[must_use]
pub fn localized(raw: &str) -> Option<Value> {
    LOCALIZED
        .captures(raw.trim())
        .map(|caps| Value::from(unescape(&caps[1])))
}

/// A description: `COMPOUND_STRING(…)`, `_(…)`, a run of quoted segments or
/// already-concatenated text, with escapes reversed.
#[must_use]
pub fn description(raw: &str) -> Option<Value> {
    let raw = raw.trim();
    let inner = raw
        .strip_prefix("COMPOUND_STRING(")
        .or_else(|| raw.strip_prefix("_("))
        .and_then(|rest| rest.strip_suffix(')'))
        .unwrap_or(raw)
        .trim();
    let text = if inner.starts_with('"') {
        segments(inner).text
    } else {
        inner.to_string()
    };
    Some(Value::from(unescape(&text)))
}

/// `A | B` to `[A, B]`; the empty union `0` to `[]`.
#[must_use]
pub fn flags(raw: &str) -> Option<Value> {
    let raw = raw.trim();
    if raw == "0" {
        return Some(Value::List(Vec::new()));
    }
    Some(Value::List(raw.split(" | ").map(scalar).collect()))
}

/// `MON_COORDS_SIZE(w, h)` to `[w, h]`.
#[must_use]
pub fn coords_size(raw: &str) -> Option<Value> {
    let caps = COORDS_SIZE.captures(raw.trim())?;
    Some(Value::List(vec![scalar(&caps[1]), scalar(&caps[2])]))
}

/// Gender ratio constants and percentage formulas to their byte value.
#[must_use]
pub fn gender_ratio(raw: &str) -> Option<Value> {
    let n = match raw.trim() {
        "MON_MALE" => MON_MALE,
        "MON_FEMALE" => MON_FEMALE,
        "MON_GENDERLESS" => MON_GENDERLESS,
        other => percent_ratio(other)?,
    };
    Some(Value::Int(n))
}

#[allow(clippy::cast_possible_truncation)]
fn percent_ratio(text: &str) -> Option<i64> {
    let caps = PERCENT_RATIO.captures(text)?;
    let percent: f64 = caps[1].parse().ok()?;
    Some((percent * 255.0 / 100.0).round_ties_even() as i64)
}

/// `STANDARD_FRIENDSHIP` to its value.
#[must_use]
pub fn friendship(raw: &str) -> Option<Value> {
    (raw.trim() == "STANDARD_FRIENDSHIP").then_some(Value::Int(STANDARD_FRIENDSHIP))
}

/// `EVOLUTION({M, P, T}, …)` or its expansion
/// `(const struct Evolution[]) { {M, P, T}, {EVOLUTIONS_END}, }` to a list of
/// `{method, param, targetSpecies}` records. Groups of another arity keep
/// their arguments under `args`.
#[must_use]
pub fn evolutions(raw: &str) -> Option<Value> {
    let raw = raw.trim();
    if !raw.starts_with("EVOLUTION(") && !raw.starts_with("(const struct Evolution[])") {
        return None;
    }
    let list = EVOLUTION_GROUP
        .captures_iter(raw)
        .filter_map(|caps| {
            let parts: Vec<&str> = caps[1].split(',').map(str::trim).collect();
            let (method, rest) = parts.split_first()?;
            if method.is_empty() || *method == EVOLUTIONS_END {
                return None;
            }
            let mut evo = Record::new();
            evo.insert("method", *method);
            if let [param, target] = rest {
                evo.insert("param", scalar(param));
                evo.insert("targetSpecies", *target);
            } else {
                evo.insert("args", Value::List(rest.iter().map(|a| scalar(a)).collect()));
            }
            Some(Value::Record(evo))
        })
        .collect();
    Some(Value::List(list))
}
