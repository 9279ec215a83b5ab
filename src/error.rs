//! Error types for classification, coercion, SQL generation and record access.
//!
//! Executor failures surface as [`ExecError`](crate::executor::ExecError) and are
//! wrapped in [`MappingError::Execution`] once they cross into the mapping layer.

use crate::executor::ExecError;
use crate::value::ColumnType;

/// Which record operation produced a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Add,
    Update,
    Delete,
    Select,
    Populate,
}

impl Operation {
    /// Human-readable verb phrase used in messages
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Add => "add",
            Operation::Update => "update",
            Operation::Delete => "delete",
            Operation::Select => "select",
            Operation::Populate => "populate",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error type for mapping operations
#[derive(Debug, Clone, PartialEq)]
pub enum MappingError {
    /// No resolvable primary key where one is required
    Classification { entity: String, reason: String },
    /// The attribute's declared type has no literal serialization
    UnsupportedType { attribute: String, column_type: ColumnType },
    /// The value cannot be written as a literal (e.g. NaN)
    InvalidLiteral { attribute: String, reason: String },
    /// A `ref_` attribute name does not decode, or its join cannot be resolved
    InvalidReference { attribute: String, reason: String },
    /// UPDATE/DELETE executed but matched nothing
    ZeroRowsAffected { operation: Operation },
    /// INSERT did not yield a usable generated key
    NoIdentityReturned { entity: String, returned: i64 },
    /// The result row has no field for the attribute
    MissingColumn { attribute: String },
    /// A stored value cannot be assigned to the attribute
    Hydration {
        attribute: String,
        expected: ColumnType,
        actual: ColumnType,
    },
    /// The entity has no attribute with that name
    UnknownAttribute { entity: String, attribute: String },
    /// The attribute exists but cannot be assigned
    ReadOnlyAttribute { attribute: String },
    /// The executor failed
    Execution(ExecError),
}

impl MappingError {
    /// Type mismatch while assigning `actual` into an attribute declared as `expected`
    #[must_use]
    pub fn type_mismatch(attribute: &str, expected: ColumnType, actual: ColumnType) -> Self {
        MappingError::Hydration {
            attribute: attribute.to_string(),
            expected,
            actual,
        }
    }

    /// Unknown attribute on entity
    #[must_use]
    pub fn unknown_attribute(entity: &str, attribute: &str) -> Self {
        MappingError::UnknownAttribute {
            entity: entity.to_string(),
            attribute: attribute.to_string(),
        }
    }
}

impl std::fmt::Display for MappingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MappingError::Classification { entity, reason } => {
                write!(f, "Classification error on {entity}: {reason}")
            }
            MappingError::UnsupportedType { attribute, column_type } => write!(
                f,
                "Type {column_type} of attribute {attribute} cannot be passed to the database"
            ),
            MappingError::InvalidLiteral { attribute, reason } => {
                write!(f, "Invalid literal for attribute {attribute}: {reason}")
            }
            MappingError::InvalidReference { attribute, reason } => {
                write!(f, "Invalid reference attribute {attribute}: {reason}")
            }
            MappingError::ZeroRowsAffected { operation } => {
                let verb = match operation {
                    Operation::Update => "updated",
                    Operation::Delete => "deleted",
                    Operation::Add => "added",
                    Operation::Select | Operation::Populate => "read",
                };
                write!(f, "no record was {verb}")
            }
            MappingError::NoIdentityReturned { entity, returned } => write!(
                f,
                "{entity} record could not be added: no new identity returned from the database (got {returned})"
            ),
            MappingError::MissingColumn { attribute } => {
                write!(f, "Result row has no column for attribute {attribute}")
            }
            MappingError::Hydration {
                attribute,
                expected,
                actual,
            } => write!(
                f,
                "Cannot assign {actual} value to attribute {attribute} of type {expected}"
            ),
            MappingError::UnknownAttribute { entity, attribute } => {
                write!(f, "{entity} has no attribute named {attribute}")
            }
            MappingError::ReadOnlyAttribute { attribute } => {
                write!(f, "Attribute {attribute} is not writable")
            }
            MappingError::Execution(e) => write!(f, "Execution failed: {e}"),
        }
    }
}

impl std::error::Error for MappingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MappingError::Execution(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ExecError> for MappingError {
    fn from(err: ExecError) -> Self {
        MappingError::Execution(err)
    }
}
