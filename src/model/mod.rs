//! Record model shared by every category: tagged values in ordered maps.
mod record;
mod value;

pub use record::Record;
pub use value::{Condition, ConditionalExpression, Value};
