//! Declared column types and the tagged `Value` union.
//!
//! Every attribute value crossing the mapping boundary is a [`Value`]. Each variant
//! carries an `Option`, where `None` means "no value" (SQL `NULL`). This keeps the
//! literal serializer and the hydration coercion exhaustive at compile time.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use std::fmt;
use uuid::Uuid;

/// Declared semantic type of an attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    /// `String`
    Text,
    /// `char`
    Char,
    /// `i8`
    TinyInt,
    /// `i16`
    SmallInt,
    /// `i32`
    Int,
    /// `i64`
    BigInt,
    /// `u8`
    TinyUnsigned,
    /// `u16`
    SmallUnsigned,
    /// `u32`
    Unsigned,
    /// `u64`
    BigUnsigned,
    /// `rust_decimal::Decimal`
    Decimal,
    /// `f64`
    Double,
    /// `f32`
    Float,
    /// `bool`
    Bool,
    /// `chrono::NaiveDateTime`
    DateTime,
    /// `Vec<u8>`
    Bytes,
    /// `uuid::Uuid`
    Uuid,
    /// `serde_json::Value`; readable from rows, never serializable as a literal
    Object,
}

impl ColumnType {
    /// Whether this is one of the integer widths
    #[must_use]
    pub fn is_integer(self) -> bool {
        matches!(
            self,
            ColumnType::TinyInt
                | ColumnType::SmallInt
                | ColumnType::Int
                | ColumnType::BigInt
                | ColumnType::TinyUnsigned
                | ColumnType::SmallUnsigned
                | ColumnType::Unsigned
                | ColumnType::BigUnsigned
        )
    }

    /// Rust-facing name used in error messages
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            ColumnType::Text => "String",
            ColumnType::Char => "char",
            ColumnType::TinyInt => "i8",
            ColumnType::SmallInt => "i16",
            ColumnType::Int => "i32",
            ColumnType::BigInt => "i64",
            ColumnType::TinyUnsigned => "u8",
            ColumnType::SmallUnsigned => "u16",
            ColumnType::Unsigned => "u32",
            ColumnType::BigUnsigned => "u64",
            ColumnType::Decimal => "Decimal",
            ColumnType::Double => "f64",
            ColumnType::Float => "f32",
            ColumnType::Bool => "bool",
            ColumnType::DateTime => "NaiveDateTime",
            ColumnType::Bytes => "Vec<u8>",
            ColumnType::Uuid => "Uuid",
            ColumnType::Object => "serde_json::Value",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A typed attribute value, `None` meaning no value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(Option<String>),
    Char(Option<char>),
    TinyInt(Option<i8>),
    SmallInt(Option<i16>),
    Int(Option<i32>),
    BigInt(Option<i64>),
    TinyUnsigned(Option<u8>),
    SmallUnsigned(Option<u16>),
    Unsigned(Option<u32>),
    BigUnsigned(Option<u64>),
    Decimal(Option<Decimal>),
    Double(Option<f64>),
    Float(Option<f32>),
    Bool(Option<bool>),
    DateTime(Option<NaiveDateTime>),
    Bytes(Option<Vec<u8>>),
    Uuid(Option<Uuid>),
    Json(Option<serde_json::Value>),
}

impl Value {
    /// The absent value of a given declared type
    #[must_use]
    pub fn null(column_type: ColumnType) -> Self {
        match column_type {
            ColumnType::Text => Value::String(None),
            ColumnType::Char => Value::Char(None),
            ColumnType::TinyInt => Value::TinyInt(None),
            ColumnType::SmallInt => Value::SmallInt(None),
            ColumnType::Int => Value::Int(None),
            ColumnType::BigInt => Value::BigInt(None),
            ColumnType::TinyUnsigned => Value::TinyUnsigned(None),
            ColumnType::SmallUnsigned => Value::SmallUnsigned(None),
            ColumnType::Unsigned => Value::Unsigned(None),
            ColumnType::BigUnsigned => Value::BigUnsigned(None),
            ColumnType::Decimal => Value::Decimal(None),
            ColumnType::Double => Value::Double(None),
            ColumnType::Float => Value::Float(None),
            ColumnType::Bool => Value::Bool(None),
            ColumnType::DateTime => Value::DateTime(None),
            ColumnType::Bytes => Value::Bytes(None),
            ColumnType::Uuid => Value::Uuid(None),
            ColumnType::Object => Value::Json(None),
        }
    }

    /// The declared type this value belongs to
    #[must_use]
    pub fn column_type(&self) -> ColumnType {
        match self {
            Value::String(_) => ColumnType::Text,
            Value::Char(_) => ColumnType::Char,
            Value::TinyInt(_) => ColumnType::TinyInt,
            Value::SmallInt(_) => ColumnType::SmallInt,
            Value::Int(_) => ColumnType::Int,
            Value::BigInt(_) => ColumnType::BigInt,
            Value::TinyUnsigned(_) => ColumnType::TinyUnsigned,
            Value::SmallUnsigned(_) => ColumnType::SmallUnsigned,
            Value::Unsigned(_) => ColumnType::Unsigned,
            Value::BigUnsigned(_) => ColumnType::BigUnsigned,
            Value::Decimal(_) => ColumnType::Decimal,
            Value::Double(_) => ColumnType::Double,
            Value::Float(_) => ColumnType::Float,
            Value::Bool(_) => ColumnType::Bool,
            Value::DateTime(_) => ColumnType::DateTime,
            Value::Bytes(_) => ColumnType::Bytes,
            Value::Uuid(_) => ColumnType::Uuid,
            Value::Json(_) => ColumnType::Object,
        }
    }

    /// Whether this value denotes "no value"
    #[must_use]
    pub fn is_null(&self) -> bool {
        match self {
            Value::String(v) => v.is_none(),
            Value::Char(v) => v.is_none(),
            Value::TinyInt(v) => v.is_none(),
            Value::SmallInt(v) => v.is_none(),
            Value::Int(v) => v.is_none(),
            Value::BigInt(v) => v.is_none(),
            Value::TinyUnsigned(v) => v.is_none(),
            Value::SmallUnsigned(v) => v.is_none(),
            Value::Unsigned(v) => v.is_none(),
            Value::BigUnsigned(v) => v.is_none(),
            Value::Decimal(v) => v.is_none(),
            Value::Double(v) => v.is_none(),
            Value::Float(v) => v.is_none(),
            Value::Bool(v) => v.is_none(),
            Value::DateTime(v) => v.is_none(),
            Value::Bytes(v) => v.is_none(),
            Value::Uuid(v) => v.is_none(),
            // JSON null inside `Some` is still a present (if empty) object
            Value::Json(v) => v.is_none(),
        }
    }

    /// Integer payload widened to `i128`, if this is a present integer
    #[must_use]
    pub fn as_i128(&self) -> Option<i128> {
        match self {
            Value::TinyInt(Some(v)) => Some(i128::from(*v)),
            Value::SmallInt(Some(v)) => Some(i128::from(*v)),
            Value::Int(Some(v)) => Some(i128::from(*v)),
            Value::BigInt(Some(v)) => Some(i128::from(*v)),
            Value::TinyUnsigned(Some(v)) => Some(i128::from(*v)),
            Value::SmallUnsigned(Some(v)) => Some(i128::from(*v)),
            Value::Unsigned(Some(v)) => Some(i128::from(*v)),
            Value::BigUnsigned(Some(v)) => Some(i128::from(*v)),
            _ => None,
        }
    }

    /// Build an integer value of the requested width, if `n` fits
    #[must_use]
    pub fn integer(column_type: ColumnType, n: i128) -> Option<Self> {
        let value = match column_type {
            ColumnType::TinyInt => Value::TinyInt(Some(i8::try_from(n).ok()?)),
            ColumnType::SmallInt => Value::SmallInt(Some(i16::try_from(n).ok()?)),
            ColumnType::Int => Value::Int(Some(i32::try_from(n).ok()?)),
            ColumnType::BigInt => Value::BigInt(Some(i64::try_from(n).ok()?)),
            ColumnType::TinyUnsigned => Value::TinyUnsigned(Some(u8::try_from(n).ok()?)),
            ColumnType::SmallUnsigned => Value::SmallUnsigned(Some(u16::try_from(n).ok()?)),
            ColumnType::Unsigned => Value::Unsigned(Some(u32::try_from(n).ok()?)),
            ColumnType::BigUnsigned => Value::BigUnsigned(Some(u64::try_from(n).ok()?)),
            _ => return None,
        };
        Some(value)
    }
}

/// Conversion between a Rust field type and [`Value`]
///
/// Implemented for every supported attribute type and for `Option<T>` of each.
/// `#[derive(Record)]` relies on this trait for its `get`/`set` bodies and for the
/// declared type of each attribute.
pub trait ColumnValue: Sized {
    /// Declared type of the attribute
    const COLUMN_TYPE: ColumnType;
    /// Whether the Rust type can hold "no value"
    const NULLABLE: bool = false;

    /// Wrap the field value
    fn into_value(self) -> Value;

    /// Unwrap a value of the exact variant; hands the value back on mismatch
    fn from_value(value: Value) -> Result<Self, Value>;
}

macro_rules! column_value {
    ($ty:ty, $variant:ident, $column:ident) => {
        impl ColumnValue for $ty {
            const COLUMN_TYPE: ColumnType = ColumnType::$column;

            fn into_value(self) -> Value {
                Value::$variant(Some(self))
            }

            fn from_value(value: Value) -> Result<Self, Value> {
                match value {
                    Value::$variant(Some(v)) => Ok(v),
                    other => Err(other),
                }
            }
        }

        impl From<$ty> for Value {
            fn from(v: $ty) -> Self {
                Value::$variant(Some(v))
            }
        }
    };
}

column_value!(String, String, Text);
column_value!(char, Char, Char);
column_value!(i8, TinyInt, TinyInt);
column_value!(i16, SmallInt, SmallInt);
column_value!(i32, Int, Int);
column_value!(i64, BigInt, BigInt);
column_value!(u8, TinyUnsigned, TinyUnsigned);
column_value!(u16, SmallUnsigned, SmallUnsigned);
column_value!(u32, Unsigned, Unsigned);
column_value!(u64, BigUnsigned, BigUnsigned);
column_value!(Decimal, Decimal, Decimal);
column_value!(f64, Double, Double);
column_value!(f32, Float, Float);
column_value!(bool, Bool, Bool);
column_value!(NaiveDateTime, DateTime, DateTime);
column_value!(Vec<u8>, Bytes, Bytes);
column_value!(Uuid, Uuid, Uuid);
column_value!(serde_json::Value, Json, Object);

impl<T: ColumnValue> ColumnValue for Option<T> {
    const COLUMN_TYPE: ColumnType = T::COLUMN_TYPE;
    const NULLABLE: bool = true;

    fn into_value(self) -> Value {
        match self {
            Some(v) => v.into_value(),
            None => Value::null(T::COLUMN_TYPE),
        }
    }

    fn from_value(value: Value) -> Result<Self, Value> {
        if value.is_null() && value.column_type() == T::COLUMN_TYPE {
            return Ok(None);
        }
        T::from_value(value).map(Some)
    }
}

impl<T: ColumnValue> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.into_value()
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(Some(v.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_round_trips_column_type() {
        for ty in [
            ColumnType::Text,
            ColumnType::Char,
            ColumnType::Int,
            ColumnType::BigUnsigned,
            ColumnType::Decimal,
            ColumnType::DateTime,
            ColumnType::Bytes,
            ColumnType::Uuid,
            ColumnType::Object,
        ] {
            let v = Value::null(ty);
            assert!(v.is_null());
            assert_eq!(v.column_type(), ty);
        }
    }

    #[test]
    fn test_option_column_value() {
        assert_eq!(<Option<i32>>::COLUMN_TYPE, ColumnType::Int);
        assert!(<Option<i32>>::NULLABLE);
        assert!(!<i32>::NULLABLE);

        assert_eq!(None::<String>.into_value(), Value::String(None));
        assert_eq!(<Option<String>>::from_value(Value::String(None)), Ok(None));
        assert_eq!(
            <Option<String>>::from_value(Value::String(Some("a".into()))),
            Ok(Some("a".to_string()))
        );
        // A null of the wrong variant is still a type mismatch
        assert!(<Option<String>>::from_value(Value::Int(None)).is_err());
    }

    #[test]
    fn test_from_value_mismatch_hands_value_back() {
        let err = i32::from_value(Value::BigInt(Some(7))).unwrap_err();
        assert_eq!(err, Value::BigInt(Some(7)));
    }

    #[test]
    fn test_integer_width_checks() {
        assert_eq!(Value::integer(ColumnType::TinyInt, 127), Some(Value::TinyInt(Some(127))));
        assert_eq!(Value::integer(ColumnType::TinyInt, 128), None);
        assert_eq!(Value::integer(ColumnType::Unsigned, -1), None);
        assert_eq!(Value::integer(ColumnType::Text, 1), None);
        assert_eq!(Value::BigUnsigned(Some(u64::MAX)).as_i128(), Some(i128::from(u64::MAX)));
    }
}
