//! Compile-time expression handling.
//!
//! Two independent pieces:
//!
//! - [`conditional`] turns symbolic ternaries such as
//!   `P_UPDATED_TYPES >= GEN_6 ? TYPE_FAIRY : TYPE_NORMAL` into structured
//!   [`ConditionalExpression`](crate::model::ConditionalExpression) values and
//!   resolves them later against a [`ConstantTable`].
//! - [`literal`] folds ternaries with no free variables straight to integers.
pub mod conditional;
pub mod literal;

use std::collections::BTreeMap;

/// Constant name to ordinal, e.g. `GEN_3 -> 2`.
pub type ConstantTable = BTreeMap<String, i64>;

/// The generation markers understood by upstream configs: `GEN_1`..`GEN_9`
/// map to `0..=8` and `GEN_LATEST` to the newest generation.
#[must_use]
pub fn default_generation_constants() -> ConstantTable {
    let mut table: ConstantTable = (1..=9).map(|n| (format!("GEN_{n}"), n - 1)).collect();
    table.insert("GEN_LATEST".to_string(), 8);
    table
}
