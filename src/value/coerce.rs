//! Stored → typed coercion used while hydrating entities from result rows.

use super::types::{ColumnType, Value};
use crate::classify::AttributeDescriptor;
use crate::config::MappingConfig;
use crate::error::MappingError;
use rust_decimal::Decimal;
use uuid::Uuid;

/// Canonical value assigned to a non-nullable attribute when the store has none
#[must_use]
pub fn default_for(column_type: ColumnType, config: &MappingConfig) -> Value {
    match column_type {
        ColumnType::Text => Value::String(Some(String::new())),
        ColumnType::Char => Value::Char(Some('\0')),
        ColumnType::TinyInt => Value::TinyInt(Some(0)),
        ColumnType::SmallInt => Value::SmallInt(Some(0)),
        ColumnType::Int => Value::Int(Some(0)),
        ColumnType::BigInt => Value::BigInt(Some(0)),
        ColumnType::TinyUnsigned => Value::TinyUnsigned(Some(0)),
        ColumnType::SmallUnsigned => Value::SmallUnsigned(Some(0)),
        ColumnType::Unsigned => Value::Unsigned(Some(0)),
        ColumnType::BigUnsigned => Value::BigUnsigned(Some(0)),
        ColumnType::Decimal => Value::Decimal(Some(Decimal::ZERO)),
        ColumnType::Double => Value::Double(Some(0.0)),
        ColumnType::Float => Value::Float(Some(0.0)),
        ColumnType::Bool => Value::Bool(Some(false)),
        // The store's minimum, not chrono's, so the value survives a write back
        ColumnType::DateTime => Value::DateTime(Some(config.min_datetime())),
        ColumnType::Bytes => Value::Bytes(Some(Vec::new())),
        ColumnType::Uuid => Value::Uuid(Some(Uuid::nil())),
        ColumnType::Object => Value::Json(Some(serde_json::Value::Null)),
    }
}

/// Convert a raw stored value into the exact variant of `attr`'s declared type
///
/// Absent values become `None` on nullable attributes and the canonical default
/// otherwise. Present values must match or be trivially convertible: lossless
/// integer width changes, integer to decimal, `f32` to `f64`, and single-character
/// text to `char` (and back). Anything else is a hydration error.
pub fn stored_to_typed(
    raw: &Value,
    attr: &AttributeDescriptor,
    config: &MappingConfig,
) -> Result<Value, MappingError> {
    let target = attr.column_type;

    if raw.is_null() {
        return Ok(if attr.nullable {
            Value::null(target)
        } else {
            default_for(target, config)
        });
    }

    let actual = raw.column_type();
    if actual == target {
        return Ok(raw.clone());
    }

    let mismatch = || MappingError::type_mismatch(attr.name, target, actual);

    if target.is_integer() {
        return raw
            .as_i128()
            .and_then(|n| Value::integer(target, n))
            .ok_or_else(mismatch);
    }

    match (target, raw) {
        (ColumnType::Decimal, _) if actual.is_integer() => {
            let n = raw.as_i128().ok_or_else(mismatch)?;
            let decimal = if let Ok(small) = i64::try_from(n) {
                Decimal::from(small)
            } else {
                Decimal::from(u64::try_from(n).map_err(|_| mismatch())?)
            };
            Ok(Value::Decimal(Some(decimal)))
        }
        (ColumnType::Double, Value::Float(Some(f))) => Ok(Value::Double(Some(f64::from(*f)))),
        (ColumnType::Text, Value::Char(Some(c))) => Ok(Value::String(Some(c.to_string()))),
        (ColumnType::Char, Value::String(Some(s))) => {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(Value::Char(Some(c))),
                _ => Err(mismatch()),
            }
        }
        _ => Err(mismatch()),
    }
}
