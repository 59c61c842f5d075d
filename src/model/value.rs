use std::fmt;

use serde::{Deserialize, Serialize};

use super::Record;

/// A single field value extracted from C source.
///
/// Serialized untagged so canonical documents stay plain JSON. Variant order
/// matters for deserialization: a mapping is tried as a
/// [`ConditionalExpression`] (which rejects unknown keys) before it falls
/// back to a nested [`Record`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Integer literal.
    Int(i64),
    /// Any text that was not coerced to something richer.
    Str(String),
    /// Ordered list (brace initializer, flag union, macro arguments).
    List(Vec<Self>),
    /// Deferred comparison over symbolic constants.
    Conditional(ConditionalExpression),
    /// Nested record.
    Record(Record),
}

impl Value {
    /// Return the integer payload, if any.
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Return the string payload, if any.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Return the list payload, if any.
    #[must_use]
    pub fn as_list(&self) -> Option<&[Self]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Return the nested record, if any.
    #[must_use]
    pub const fn as_record(&self) -> Option<&Record> {
        match self {
            Self::Record(r) => Some(r),
            _ => None,
        }
    }

    /// Mutable access to the nested record, if any.
    pub const fn as_record_mut(&mut self) -> Option<&mut Record> {
        match self {
            Self::Record(r) => Some(r),
            _ => None,
        }
    }

    /// Coerce a scalar to an integer, accepting numeric strings.
    #[must_use]
    pub fn to_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            Self::Str(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<Record> for Value {
    fn from(r: Record) -> Self {
        Self::Record(r)
    }
}

impl From<Vec<Self>> for Value {
    fn from(items: Vec<Self>) -> Self {
        Self::List(items)
    }
}

/// Comparison operator of a [`ConditionalExpression`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Condition {
    /// `==`
    #[serde(rename = "==")]
    Eq,
    /// `!=`
    #[serde(rename = "!=")]
    Ne,
    /// `>`
    #[serde(rename = ">")]
    Gt,
    /// `>=`
    #[serde(rename = ">=")]
    Ge,
    /// `<`
    #[serde(rename = "<")]
    Lt,
    /// `<=`
    #[serde(rename = "<=")]
    Le,
}

impl Condition {
    /// Parse a C comparison operator.
    #[must_use]
    pub fn parse(op: &str) -> Option<Self> {
        Some(match op {
            "==" => Self::Eq,
            "!=" => Self::Ne,
            ">" => Self::Gt,
            ">=" => Self::Ge,
            "<" => Self::Lt,
            "<=" => Self::Le,
            _ => return None,
        })
    }

    /// The operator as written in C.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Lt => "<",
            Self::Le => "<=",
        }
    }

    /// Apply the comparison.
    #[must_use]
    pub const fn holds(self, lhs: i64, rhs: i64) -> bool {
        match self {
            Self::Eq => lhs == rhs,
            Self::Ne => lhs != rhs,
            Self::Gt => lhs > rhs,
            Self::Ge => lhs >= rhs,
            Self::Lt => lhs < rhs,
            Self::Le => lhs <= rhs,
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A compile-time ternary over symbolic constants, kept unevaluated until a
/// constant table is available.
///
/// `param1 condition param2 ? true_value : false_value`, followed by
/// `+ to_add` or `- to_subtract` when the source carried trailing arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConditionalExpression {
    /// Left operand (usually a constant name such as `P_UPDATED_TYPES`).
    pub param1: String,
    /// Comparison operator.
    pub condition: Condition,
    /// Right operand (usually a constant name such as `GEN_6`).
    pub param2: String,
    /// Branch taken when the comparison holds.
    pub true_value: Box<Value>,
    /// Branch taken otherwise.
    pub false_value: Box<Value>,
    /// Added to the selected branch.
    #[serde(default)]
    pub to_add: i64,
    /// Subtracted from the selected branch.
    #[serde(default)]
    pub to_subtract: i64,
}
