//! The `Record` trait: a compile-time attribute descriptor for an entity type.
//!
//! `#[derive(Record)]` generates this for plain structs. Implementing it by hand
//! is supported too; the mapping engine only ever goes through these methods.

use crate::error::MappingError;
use crate::value::{ColumnType, Value};

/// Static description of one attribute, in declaration order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeDef {
    /// Attribute name; also the column name
    pub name: &'static str,
    /// Declared semantic type
    pub column_type: ColumnType,
    /// Whether the Rust type can hold "no value" (`Option<T>`)
    pub nullable: bool,
    /// Non-writable attributes are never persisted
    pub writable: bool,
}

impl AttributeDef {
    /// Writable, non-nullable attribute
    #[must_use]
    pub const fn new(name: &'static str, column_type: ColumnType) -> Self {
        Self {
            name,
            column_type,
            nullable: false,
            writable: true,
        }
    }

    #[must_use]
    pub const fn nullable(self) -> Self {
        Self {
            nullable: true,
            ..self
        }
    }

    #[must_use]
    pub const fn read_only(self) -> Self {
        Self {
            writable: false,
            ..self
        }
    }
}

/// Per-entity-type overrides of the naming conventions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordOverrides {
    /// Table name; defaults to the type name
    pub entity_name: Option<&'static str>,
    /// Primary key attribute name, bypassing the key naming convention
    pub primary_key_name: Option<&'static str>,
    /// The key is caller-supplied: include it in INSERT, fetch no identity
    pub primary_key_not_identity: bool,
}

/// A mapped entity type
///
/// # Example
///
/// ```
/// use mooring::{AttributeDef, ColumnType, MappingError, Record, Value};
///
/// #[derive(Default)]
/// struct Tag {
///     tag_id: i32,
///     label: String,
/// }
///
/// impl Record for Tag {
///     fn type_name() -> &'static str { "Tag" }
///     fn attributes() -> &'static [AttributeDef] {
///         const ATTRS: &[AttributeDef] = &[
///             AttributeDef::new("tag_id", ColumnType::Int),
///             AttributeDef::new("label", ColumnType::Text),
///         ];
///         ATTRS
///     }
///     fn get(&self, name: &str) -> Option<Value> {
///         match name {
///             "tag_id" => Some(self.tag_id.into()),
///             "label" => Some(self.label.clone().into()),
///             _ => None,
///         }
///     }
///     fn set(&mut self, name: &str, value: Value) -> Result<(), MappingError> {
///         match (name, value) {
///             ("tag_id", Value::Int(Some(v))) => self.tag_id = v,
///             ("label", Value::String(Some(v))) => self.label = v,
///             (name, other) => {
///                 return Err(MappingError::unknown_attribute("Tag", &format!("{name} ({other:?})")))
///             }
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Record: Default + 'static {
    /// The type's own name; the default table name
    fn type_name() -> &'static str;

    /// All attributes in declaration order
    fn attributes() -> &'static [AttributeDef];

    /// Naming-convention overrides for this type
    fn overrides() -> RecordOverrides {
        RecordOverrides::default()
    }

    /// Current value of an attribute, `None` if there is no such (readable) attribute
    fn get(&self, name: &str) -> Option<Value>;

    /// Assign a value of the attribute's exact declared variant
    fn set(&mut self, name: &str, value: Value) -> Result<(), MappingError>;

    /// Table name after overrides
    fn table_name() -> &'static str {
        Self::overrides().entity_name.unwrap_or_else(Self::type_name)
    }
}
