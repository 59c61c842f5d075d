//! Symbolic ternaries: decompose at extraction, resolve at render time.
use crate::model::{Condition, ConditionalExpression, Value};

use super::ConstantTable;

crate::static_regex! {
    TRAILING_ARITHMETIC = r"^(.*?)\s+([+-])\s+(\d+)\s*$";
}

crate::static_regex! {
    CONDITIONAL = r"(?:\b|\()\s*(\w+)\s*(==|!=|>=|<=|>|<)\s*(\w+)\s*\)?\s*\?\s*(.+?)\s*:\s*(.+?)\s*(?:\)|$)";
}

/// Recognize `<param1> <cmp> <param2> ? <true> : <false>` (optionally
/// followed by `+ N` / `- N`) and turn it into a [`ConditionalExpression`].
///
/// Only the first match in `text` is decomposed; anything else in the value
/// is discarded with it. Returns `None` when nothing matches.
#[must_use]
pub fn decompose(text: &str) -> Option<ConditionalExpression> {
    let (body, to_add, to_subtract) = match TRAILING_ARITHMETIC.captures(text) {
        Some(caps) if CONDITIONAL.is_match(&caps[1]) => {
            let amount: i64 = caps[3].parse().ok()?;
            if &caps[2] == "+" {
                (caps.get(1)?.as_str(), amount, 0)
            } else {
                (caps.get(1)?.as_str(), 0, amount)
            }
        }
        _ => (text, 0, 0),
    };

    let caps = CONDITIONAL.captures(body)?;
    Some(ConditionalExpression {
        param1: caps[1].to_string(),
        condition: Condition::parse(&caps[2])?,
        param2: caps[3].to_string(),
        true_value: Box::new(scalar(&caps[4])),
        false_value: Box::new(scalar(&caps[5])),
        to_add,
        to_subtract,
    })
}

fn scalar(text: &str) -> Value {
    let text = text.trim();
    text.parse::<i64>()
        .map_or_else(|_| Value::from(text), Value::Int)
}

fn operand(name: &str, constants: &ConstantTable) -> Option<i64> {
    constants
        .get(name)
        .copied()
        .or_else(|| name.parse().ok())
}

/// Resolve a conditional against `constants`.
///
/// Operands are looked up by name (numeric operands are taken literally).
/// The selected branch is coerced to an integer when numeric and the
/// trailing arithmetic applied; a non-numeric branch is returned as-is.
/// Returns `None` when an operand is unknown.
#[must_use]
pub fn resolve(expr: &ConditionalExpression, constants: &ConstantTable) -> Option<Value> {
    let lhs = operand(&expr.param1, constants)?;
    let rhs = operand(&expr.param2, constants)?;
    let chosen = if expr.condition.holds(lhs, rhs) {
        &expr.true_value
    } else {
        &expr.false_value
    };
    Some(chosen.to_int().map_or_else(
        || (**chosen).clone(),
        |n| Value::Int(n + expr.to_add - expr.to_subtract),
    ))
}

/// Resolve every conditional inside `value` (lists are walked), leaving
/// anything unresolvable untouched.
#[must_use]
pub fn resolve_value(value: &Value, constants: &ConstantTable) -> Value {
    match value {
        Value::Conditional(expr) => resolve(expr, constants).unwrap_or_else(|| value.clone()),
        Value::List(items) => Value::List(
            items
                .iter()
                .map(|item| resolve_value(item, constants))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// Render a conditional back to C text.
///
/// Trailing arithmetic is emitted outside parentheses so the result
/// re-extracts to the same record.
#[must_use]
pub fn to_literal(expr: &ConditionalExpression) -> String {
    let base = format!(
        "{} {} {} ? {} : {}",
        expr.param1,
        expr.condition,
        expr.param2,
        branch_text(&expr.true_value),
        branch_text(&expr.false_value),
    );
    if expr.to_add != 0 {
        format!("({base}) + {}", expr.to_add)
    } else if expr.to_subtract != 0 {
        format!("({base}) - {}", expr.to_subtract)
    } else {
        base
    }
}

fn branch_text(value: &Value) -> String {
    match value {
        Value::Int(n) => n.to_string(),
        Value::Str(s) => s.clone(),
        Value::Conditional(inner) => format!("({})", to_literal(inner)),
        other => serde_json::to_string(other).unwrap_or_default(),
    }
}
