//! Cart Items

pub(crate) mod handlers;

pub(crate) use handlers::*;

use serde_json::Value;

/// A quantity field that is present but is not a JSON integer.
#[derive(Debug, thiserror::Error)]
#[error("quantity must be an integer")]
pub(crate) struct NonIntegerQuantity;

/// Read a raw JSON quantity. `None` and `null` yield `default`; strings,
/// floats and booleans are refused rather than coerced.
pub(crate) fn parse_quantity(
    value: Option<&Value>,
    default: Option<i64>,
) -> Result<i64, NonIntegerQuantity> {
    match value {
        None | Some(Value::Null) => default.ok_or(NonIntegerQuantity),
        Some(Value::Number(number)) => number
            .as_i64()
            .or_else(|| number.as_u64().map(|_| i64::MAX))
            .ok_or(NonIntegerQuantity),
        Some(_) => Err(NonIntegerQuantity),
    }
}
