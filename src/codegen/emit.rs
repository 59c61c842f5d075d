//! C renderings of record values.
use anyhow::Result;

use crate::error::GenerationError;
use crate::expr::ConstantTable;
use crate::expr::conditional::{resolve, to_literal};
use crate::model::{Record, Value};
use crate::parse::strings::escape;

/// Indent of a designator header (`    [ID] =`).
pub const BLOCK_INDENT: &str = "    ";
/// Indent of a field line inside a designator block.
pub const FIELD_INDENT: &str = "        ";
/// Indent of a continuation line inside a field value.
pub const CONTINUATION_INDENT: &str = "            ";

fn unrenderable(entity: &str, field: &str, reason: &str) -> GenerationError {
    GenerationError::Unrenderable {
        entity: entity.to_string(),
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

/// Render a scalar, list or conditional.
///
/// Conditionals resolve against `constants` when every operand is known;
/// otherwise they are written back as their literal ternary. Lists become
/// `{ A, B }`.
///
/// # Errors
///
/// Returns [`GenerationError::Unrenderable`] for nested records, which have
/// no generic C form.
pub fn render(entity: &str, field: &str, value: &Value, constants: &ConstantTable) -> Result<String> {
    Ok(match value {
        Value::Int(n) => n.to_string(),
        Value::Str(s) => s.clone(),
        Value::List(items) => brace_list(
            &items
                .iter()
                .map(|item| render(entity, field, item, constants))
                .collect::<Result<Vec<_>>>()?,
        ),
        Value::Conditional(expr) => match resolve(expr, constants) {
            Some(resolved) if !matches!(resolved, Value::Conditional(_)) => {
                render(entity, field, &resolved, constants)?
            }
            _ => to_literal(expr),
        },
        Value::Record(_) => {
            return Err(unrenderable(entity, field, "nested record").into());
        }
    })
}

/// `{ A, B }`, or `{ }` when empty.
#[must_use]
pub fn brace_list(items: &[String]) -> String {
    if items.is_empty() {
        return "{ }".to_string();
    }
    format!("{{ {} }}", items.join(", "))
}

/// `_("escaped text")`.
#[must_use]
pub fn localized(text: &str) -> String {
    format!("_(\"{}\")", escape(text))
}

/// A `COMPOUND_STRING(` literal with one quoted segment per source line.
///
/// Every segment but the last keeps its `\n`; the final segment carries the
/// closing parenthesis. The field-line comma is left to the caller.
#[must_use]
pub fn compound_string(text: &str) -> String {
    if text.is_empty() {
        return "COMPOUND_STRING(\"\")".to_string();
    }
    let lines: Vec<&str> = text.split('\n').collect();
    let last = lines.len() - 1;
    let mut out = String::from("COMPOUND_STRING(");
    for (i, line) in lines.iter().enumerate() {
        out.push('\n');
        out.push_str(CONTINUATION_INDENT);
        out.push('"');
        out.push_str(&escape(line));
        if i == last {
            out.push_str("\")");
        } else {
            out.push_str("\\n\"");
        }
    }
    out
}

/// `MON_COORDS_SIZE(w, h)` from a two-element list.
///
/// # Errors
///
/// Returns [`GenerationError::Unrenderable`] for any other shape.
pub fn coords_size(entity: &str, field: &str, value: &Value, constants: &ConstantTable) -> Result<String> {
    match value.as_list() {
        Some([w, h]) => Ok(format!(
            "MON_COORDS_SIZE({}, {})",
            render(entity, field, w, constants)?,
            render(entity, field, h, constants)?
        )),
        _ => Err(unrenderable(entity, field, "expected a [width, height] pair").into()),
    }
}

/// `A | B` from a list; a non-list value renders as itself.
///
/// # Errors
///
/// Propagates element rendering failures.
pub fn flags(entity: &str, field: &str, value: &Value, constants: &ConstantTable) -> Result<String> {
    let Some(items) = value.as_list() else {
        return render(entity, field, value, constants);
    };
    if items.is_empty() {
        return Ok("0".to_string());
    }
    Ok(items
        .iter()
        .map(|item| render(entity, field, item, constants))
        .collect::<Result<Vec<_>>>()?
        .join(" | "))
}

/// `EVOLUTION({M, P, T}, …)` from a list of evolution records.
///
/// An empty list renders the terminator-only array so the field keeps its
/// place in the block.
///
/// # Errors
///
/// Returns [`GenerationError::Unrenderable`] when an element is not an
/// evolution record.
pub fn evolutions(entity: &str, field: &str, value: &Value, constants: &ConstantTable) -> Result<String> {
    let Some(items) = value.as_list() else {
        return render(entity, field, value, constants);
    };
    if items.is_empty() {
        return Ok("(const struct Evolution[]) { {EVOLUTIONS_END}, }".to_string());
    }
    let groups = items
        .iter()
        .map(|item| {
            let evo = item
                .as_record()
                .ok_or_else(|| unrenderable(entity, field, "evolution is not a record"))?;
            evolution_group(entity, field, evo, constants)
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(format!("EVOLUTION({})", groups.join(", ")))
}

fn evolution_group(entity: &str, field: &str, evo: &Record, constants: &ConstantTable) -> Result<String> {
    let method = evo
        .get("method")
        .ok_or_else(|| unrenderable(entity, field, "evolution without a method"))?;
    let mut parts = vec![render(entity, field, method, constants)?];
    if let Some(args) = evo.get("args").and_then(Value::as_list) {
        for arg in args {
            parts.push(render(entity, field, arg, constants)?);
        }
    } else {
        for key in ["param", "targetSpecies"] {
            let part = evo
                .get(key)
                .ok_or_else(|| unrenderable(entity, field, &format!("evolution without {key}")))?;
            parts.push(render(entity, field, part, constants)?);
        }
    }
    Ok(format!("{{{}}}", parts.join(", ")))
}

/// Lines of one designator block:
///
/// ```text
///     [ID] =
///     {
///         .key = value,
///     },
/// ```
#[must_use]
pub fn designator_block(id: &str, fields: &[(String, String)]) -> Vec<String> {
    let mut lines = Vec::with_capacity(fields.len() + 3);
    lines.push(format!("{BLOCK_INDENT}[{id}] ="));
    lines.push(format!("{BLOCK_INDENT}{{"));
    for (key, value) in fields {
        lines.push(format!("{FIELD_INDENT}.{key} = {value},"));
    }
    lines.push(format!("{BLOCK_INDENT}}},"));
    lines
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::expr::default_generation_constants;
    use crate::model::{Condition, ConditionalExpression};

    fn conditional() -> Value {
        Value::Conditional(ConditionalExpression {
            param1: "P_UPDATED_TYPES".to_string(),
            condition: Condition::Ge,
            param2: "GEN_6".to_string(),
            true_value: Box::new(Value::from("TYPE_FAIRY")),
            false_value: Box::new(Value::from("TYPE_NORMAL")),
            to_add: 0,
            to_subtract: 0,
        })
    }

    #[test]
    fn lists_render_as_brace_initializers() {
        let value = Value::List(vec![Value::from("TYPE_GRASS"), Value::from("TYPE_POISON")]);
        let text = render("SPECIES_BULBASAUR", "types", &value, &ConstantTable::new()).unwrap();
        insta::assert_snapshot!(text, @"{ TYPE_GRASS, TYPE_POISON }");
    }

    #[test]
    fn unresolvable_conditional_stays_literal() {
        let text = render("SPECIES_CLEFAIRY", "types", &conditional(), &default_generation_constants())
            .unwrap();
        insta::assert_snapshot!(text, @"P_UPDATED_TYPES >= GEN_6 ? TYPE_FAIRY : TYPE_NORMAL");
    }

    #[test]
    fn resolvable_conditional_picks_branch() {
        let mut constants = default_generation_constants();
        constants.insert("P_UPDATED_TYPES".to_string(), 8);
        let text = render("SPECIES_CLEFAIRY", "types", &conditional(), &constants).unwrap();
        assert_eq!(text, "TYPE_FAIRY");
    }

    #[test]
    fn nested_record_is_unrenderable() {
        let err = render("X", "data", &Value::Record(Record::new()), &ConstantTable::new()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<GenerationError>(),
            Some(GenerationError::Unrenderable { field, .. }) if field == "data"
        ));
    }

    #[test]
    fn compound_string_splits_lines() {
        let text = compound_string("A strange \"seed\"\nwas planted.");
        assert_eq!(
            text,
            "COMPOUND_STRING(\n            \"A strange \\\"seed\\\"\\n\"\n            \"was planted.\")"
        );
        insta::assert_snapshot!(compound_string(""), @r#"COMPOUND_STRING("")"#);
    }

    #[test]
    fn evolutions_render_both_shapes() {
        let mut evo = Record::new();
        evo.insert("method", "EVO_LEVEL");
        evo.insert("param", 16);
        evo.insert("targetSpecies", "SPECIES_IVYSAUR");
        let value = Value::List(vec![Value::Record(evo)]);
        let text = evolutions("SPECIES_BULBASAUR", "evolutions", &value, &ConstantTable::new()).unwrap();
        insta::assert_snapshot!(text, @"EVOLUTION({EVO_LEVEL, 16, SPECIES_IVYSAUR})");
        let empty = evolutions("SPECIES_MEW", "evolutions", &Value::List(vec![]), &ConstantTable::new())
            .unwrap();
        insta::assert_snapshot!(empty, @"(const struct Evolution[]) { {EVOLUTIONS_END}, }");
    }

    #[test]
    fn block_layout() {
        let lines = designator_block("SPECIES_MEW", &[("baseHP".to_string(), "100".to_string())]);
        assert_eq!(
            lines,
            vec!["    [SPECIES_MEW] =", "    {", "        .baseHP = 100,", "    },"]
        );
    }
}
