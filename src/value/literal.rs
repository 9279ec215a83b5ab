//! Typed → literal serialization for statements that embed values as SQL text.
//!
//! Literal rules:
//! - text/char: single-quoted, embedded quotes doubled
//! - date-time: clamped to the configured store range, `'yyyyMMdd HH:mm:ss'`
//! - decimal/double/float: invariant numeric text (`.` separator, no grouping)
//! - integers: plain decimal text
//! - bool: `1` / `0`
//! - bytes: `0x` followed by uppercase hex
//! - uuid: single-quoted hyphenated form
//! - absent value of any type: `NULL`
//! - opaque objects: rejected with [`MappingError::UnsupportedType`]

use super::types::Value;
use crate::config::MappingConfig;
use crate::error::MappingError;
use chrono::NaiveDateTime;

/// SQL `NULL` token
pub const NULL: &str = "NULL";

const DATE_FORMAT: &str = "%Y%m%d %H:%M:%S";

/// Quote a string literal, doubling embedded single quotes
#[must_use]
pub fn quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

/// Clamp a timestamp into `[sql_min_date, sql_max_date]`
///
/// An inverted range never panics: the lower bound wins.
#[must_use]
pub fn clamp_datetime(dt: NaiveDateTime, config: &MappingConfig) -> NaiveDateTime {
    let (min, max) = (config.min_datetime(), config.max_datetime());
    if dt < min {
        min
    } else if dt > max {
        max.max(min)
    } else {
        dt
    }
}

/// Clamp dates in a value; every other value is returned unchanged
#[must_use]
pub fn clamp_value(value: &Value, config: &MappingConfig) -> Value {
    match value {
        Value::DateTime(Some(dt)) => Value::DateTime(Some(clamp_datetime(*dt, config))),
        other => other.clone(),
    }
}

/// Serialize `value` of attribute `attribute` as a SQL literal
pub fn to_literal(
    attribute: &str,
    value: &Value,
    config: &MappingConfig,
) -> Result<String, MappingError> {
    if value.is_null() {
        return Ok(NULL.to_string());
    }

    let literal = match value {
        Value::String(Some(s)) => quote(s),
        Value::Char(Some(c)) => quote(c.encode_utf8(&mut [0u8; 4])),
        Value::DateTime(Some(dt)) => {
            format!("'{}'", clamp_datetime(*dt, config).format(DATE_FORMAT))
        }
        Value::Decimal(Some(d)) => d.to_string(),
        Value::Double(Some(d)) => finite(attribute, d.is_finite(), d)?,
        Value::Float(Some(f)) => finite(attribute, f.is_finite(), f)?,
        Value::TinyInt(Some(i)) => i.to_string(),
        Value::SmallInt(Some(i)) => i.to_string(),
        Value::Int(Some(i)) => i.to_string(),
        Value::BigInt(Some(i)) => i.to_string(),
        Value::TinyUnsigned(Some(u)) => u.to_string(),
        Value::SmallUnsigned(Some(u)) => u.to_string(),
        Value::Unsigned(Some(u)) => u.to_string(),
        Value::BigUnsigned(Some(u)) => u.to_string(),
        Value::Bool(Some(b)) => String::from(if *b { "1" } else { "0" }),
        Value::Bytes(Some(bytes)) => format!("0x{}", hex::encode_upper(bytes)),
        Value::Uuid(Some(id)) => format!("'{}'", id.hyphenated()),
        Value::Json(Some(_)) => {
            return Err(MappingError::UnsupportedType {
                attribute: attribute.to_string(),
                column_type: value.column_type(),
            })
        }
        // `is_null` covered every `None` payload above
        Value::String(None)
        | Value::Char(None)
        | Value::TinyInt(None)
        | Value::SmallInt(None)
        | Value::Int(None)
        | Value::BigInt(None)
        | Value::TinyUnsigned(None)
        | Value::SmallUnsigned(None)
        | Value::Unsigned(None)
        | Value::BigUnsigned(None)
        | Value::Decimal(None)
        | Value::Double(None)
        | Value::Float(None)
        | Value::Bool(None)
        | Value::DateTime(None)
        | Value::Bytes(None)
        | Value::Uuid(None)
        | Value::Json(None) => NULL.to_string(),
    };

    Ok(literal)
}

fn finite(attribute: &str, is_finite: bool, n: &dyn std::fmt::Display) -> Result<String, MappingError> {
    if is_finite {
        Ok(n.to_string())
    } else {
        Err(MappingError::InvalidLiteral {
            attribute: attribute.to_string(),
            reason: format!("{n} has no SQL literal"),
        })
    }
}
