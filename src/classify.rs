//! Attribute classification by naming convention.
//!
//! Every attribute of a [`Record`] falls into exactly one [`Role`]:
//!
//! 1. `Model_`/`Cargo_` prefix, or not writable: [`Role::Cargo`], never persisted
//! 2. first remaining attribute named `id_*` (any case), `*ID` or `*_id`: [`Role::PrimaryKey`]
//! 3. `ref_*` (any case): [`Role::Reference`]
//! 4. everything else: [`Role::DataColumn`]
//!
//! Classifications are built once per type and cached by `TypeId`.

use crate::error::MappingError;
use crate::record::{AttributeDef, Record, RecordOverrides};
use crate::value::ColumnType;
use once_cell::sync::Lazy;
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Name prefixes that mark an attribute as non-persisted
pub const RESERVED_PREFIXES: [&str; 2] = ["Model_", "Cargo_"];

const REFERENCE_PREFIX: &str = "ref_";

static CACHE: Lazy<RwLock<HashMap<TypeId, Arc<Classification>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Mapping role of an attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Excluded from persistence
    Cargo,
    /// Foreign-table column pulled in through the select list
    Reference,
    /// Row identifier
    PrimaryKey,
    /// Plain persisted column
    DataColumn,
}

/// An attribute together with its derived role
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeDescriptor {
    pub name: &'static str,
    pub column_type: ColumnType,
    pub nullable: bool,
    pub writable: bool,
    pub role: Role,
}

impl AttributeDescriptor {
    #[must_use]
    pub fn is_data(&self) -> bool {
        self.role != Role::Cargo
    }
}

/// `Model_`/`Cargo_` prefixed (case-sensitive)
#[must_use]
pub fn is_reserved_name(name: &str) -> bool {
    RESERVED_PREFIXES.iter().any(|prefix| name.starts_with(prefix))
}

/// `id_` prefix (case-insensitive), `ID` suffix or `_id` suffix
#[must_use]
pub fn matches_key_convention(name: &str) -> bool {
    starts_with_ignore_case(name, "id_") || name.ends_with("ID") || name.ends_with("_id")
}

/// `ref_` prefix (case-insensitive)
#[must_use]
pub fn is_reference_name(name: &str) -> bool {
    starts_with_ignore_case(name, REFERENCE_PREFIX)
}

pub(crate) fn starts_with_ignore_case(name: &str, prefix: &str) -> bool {
    name.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

/// The classified attribute list of one entity type
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    entity: &'static str,
    table: &'static str,
    overrides: RecordOverrides,
    attributes: Vec<AttributeDescriptor>,
    primary_key: Option<usize>,
}

impl Classification {
    /// Classify a raw attribute list
    #[must_use]
    pub fn from_defs(
        entity: &'static str,
        defs: &[AttributeDef],
        overrides: RecordOverrides,
    ) -> Self {
        let mut primary_key = None;
        let mut attributes = Vec::with_capacity(defs.len());

        for (idx, def) in defs.iter().enumerate() {
            let role = if is_reserved_name(def.name) || !def.writable {
                Role::Cargo
            } else if primary_key.is_none() && is_key_candidate(def.name, &overrides) {
                primary_key = Some(idx);
                Role::PrimaryKey
            } else if is_reference_name(def.name) {
                Role::Reference
            } else {
                Role::DataColumn
            };

            attributes.push(AttributeDescriptor {
                name: def.name,
                column_type: def.column_type,
                nullable: def.nullable,
                writable: def.writable,
                role,
            });
        }

        Self {
            entity,
            table: overrides.entity_name.unwrap_or(entity),
            overrides,
            attributes,
            primary_key,
        }
    }

    /// Entity type name
    #[must_use]
    pub fn entity(&self) -> &'static str {
        self.entity
    }

    /// Table name after overrides
    #[must_use]
    pub fn table(&self) -> &'static str {
        self.table
    }

    #[must_use]
    pub fn overrides(&self) -> &RecordOverrides {
        &self.overrides
    }

    /// Every attribute, cargo included
    pub fn all(&self) -> impl Iterator<Item = &AttributeDescriptor> {
        self.attributes.iter()
    }

    /// Cargo excluded
    pub fn data(&self) -> impl Iterator<Item = &AttributeDescriptor> {
        self.attributes.iter().filter(|a| a.is_data())
    }

    /// Cargo and references excluded
    pub fn data_without_refs(&self) -> impl Iterator<Item = &AttributeDescriptor> {
        self.data().filter(|a| a.role != Role::Reference)
    }

    /// Cargo, references and the primary key excluded
    pub fn data_without_pk_or_refs(&self) -> impl Iterator<Item = &AttributeDescriptor> {
        self.data_without_refs().filter(|a| a.role != Role::PrimaryKey)
    }

    /// References only
    pub fn references(&self) -> impl Iterator<Item = &AttributeDescriptor> {
        self.attributes.iter().filter(|a| a.role == Role::Reference)
    }

    /// Columns an INSERT writes: the key is included only when it is not an identity
    #[must_use]
    pub fn insert_columns(&self) -> Vec<&AttributeDescriptor> {
        if self.overrides.primary_key_not_identity {
            self.data_without_refs().collect()
        } else {
            self.data_without_pk_or_refs().collect()
        }
    }

    /// The primary key, if one resolves
    #[must_use]
    pub fn primary_key(&self) -> Option<&AttributeDescriptor> {
        self.primary_key.map(|idx| &self.attributes[idx])
    }

    /// The primary key, or a classification error for operations that need one
    pub fn require_primary_key(&self) -> Result<&AttributeDescriptor, MappingError> {
        self.primary_key().ok_or_else(|| MappingError::Classification {
            entity: self.entity.to_string(),
            reason: match self.overrides.primary_key_name {
                Some(name) => format!("primary key override {name} names no persisted attribute"),
                None => "no attribute follows the primary key naming convention".to_string(),
            },
        })
    }

    /// Attribute lookup, case-insensitive
    #[must_use]
    pub fn attribute_by_name(&self, name: &str) -> Option<&AttributeDescriptor> {
        self.attributes
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
    }

    /// Whether the key is store-generated
    #[must_use]
    pub fn has_identity_key(&self) -> bool {
        !self.overrides.primary_key_not_identity
    }
}

fn is_key_candidate(name: &str, overrides: &RecordOverrides) -> bool {
    match overrides.primary_key_name {
        Some(key) => name.eq_ignore_ascii_case(key),
        None => matches_key_convention(name),
    }
}

/// The cached classification of `R`
pub fn classify<R: Record>() -> Arc<Classification> {
    let type_id = TypeId::of::<R>();

    if let Ok(cache) = CACHE.read() {
        if let Some(found) = cache.get(&type_id) {
            return Arc::clone(found);
        }
    }

    let built = Arc::new(Classification::from_defs(
        R::type_name(),
        R::attributes(),
        R::overrides(),
    ));

    match CACHE.write() {
        Ok(mut cache) => Arc::clone(cache.entry(type_id).or_insert(built)),
        // A poisoned cache only costs a rebuild per call
        Err(_) => built,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defs() -> Vec<AttributeDef> {
        vec![
            AttributeDef::new("Cargo_Scratch", ColumnType::Text),
            AttributeDef::new("CustomerID", ColumnType::Int),
            AttributeDef::new("Name", ColumnType::Text),
            AttributeDef::new("RegionID", ColumnType::Int),
            AttributeDef::new("ref_Region_RegionName", ColumnType::Text),
            AttributeDef::new("Computed", ColumnType::Int).read_only(),
            AttributeDef::new("Model_State", ColumnType::Int),
        ]
    }

    #[test]
    fn test_convention_predicates() {
        assert!(is_reserved_name("Cargo_Notes"));
        assert!(is_reserved_name("Model_Overrides"));
        assert!(!is_reserved_name("cargo_notes"));

        assert!(matches_key_convention("id_Customer"));
        assert!(matches_key_convention("ID_Customer"));
        assert!(matches_key_convention("CustomerID"));
        assert!(matches_key_convention("customer_id"));
        assert!(!matches_key_convention("CustomerId"));
        assert!(!matches_key_convention("id"));
        assert!(!matches_key_convention("Identity"));

        assert!(is_reference_name("ref_Orders_Total"));
        assert!(is_reference_name("Ref_Orders_Total"));
        assert!(!is_reference_name("refund"));
    }

    #[test]
    fn test_roles_follow_declaration_order() {
        let c = Classification::from_defs("Customer", &defs(), RecordOverrides::default());
        let roles: Vec<_> = c.all().map(|a| (a.name, a.role)).collect();
        assert_eq!(
            roles,
            vec![
                ("Cargo_Scratch", Role::Cargo),
                ("CustomerID", Role::PrimaryKey),
                ("Name", Role::DataColumn),
                ("RegionID", Role::DataColumn),
                ("ref_Region_RegionName", Role::Reference),
                ("Computed", Role::Cargo),
                ("Model_State", Role::Cargo),
            ]
        );
    }

    #[test]
    fn test_first_key_match_wins() {
        let c = Classification::from_defs("Customer", &defs(), RecordOverrides::default());
        assert_eq!(c.primary_key().map(|a| a.name), Some("CustomerID"));
    }

    #[test]
    fn test_cargo_key_name_is_not_primary_key() {
        let defs = [
            AttributeDef::new("Cargo_ParentID", ColumnType::Int),
            AttributeDef::new("id_Child", ColumnType::BigInt),
        ];
        let c = Classification::from_defs("Child", &defs, RecordOverrides::default());
        assert_eq!(c.primary_key().map(|a| a.name), Some("id_Child"));
    }

    #[test]
    fn test_derived_queries() {
        let c = Classification::from_defs("Customer", &defs(), RecordOverrides::default());
        let names = |it: Vec<&AttributeDescriptor>| it.iter().map(|a| a.name).collect::<Vec<_>>();

        assert_eq!(
            names(c.data().collect()),
            vec!["CustomerID", "Name", "RegionID", "ref_Region_RegionName"]
        );
        assert_eq!(names(c.data_without_refs().collect()), vec!["CustomerID", "Name", "RegionID"]);
        assert_eq!(names(c.data_without_pk_or_refs().collect()), vec!["Name", "RegionID"]);
        assert_eq!(names(c.insert_columns()), vec!["Name", "RegionID"]);
        assert_eq!(names(c.references().collect()), vec!["ref_Region_RegionName"]);
    }

    #[test]
    fn test_not_identity_inserts_key() {
        let overrides = RecordOverrides {
            primary_key_not_identity: true,
            ..RecordOverrides::default()
        };
        let c = Classification::from_defs("Customer", &defs(), overrides);
        let cols: Vec<_> = c.insert_columns().iter().map(|a| a.name).collect();
        assert_eq!(cols, vec!["CustomerID", "Name", "RegionID"]);
        assert!(!c.has_identity_key());
    }

    #[test]
    fn test_missing_primary_key_is_reported_by_callers() {
        let defs = [AttributeDef::new("Name", ColumnType::Text)];
        let c = Classification::from_defs("Note", &defs, RecordOverrides::default());
        assert!(c.primary_key().is_none());
        let err = c.require_primary_key().unwrap_err();
        assert!(matches!(err, MappingError::Classification { .. }));
    }

    #[test]
    fn test_primary_key_name_override() {
        let defs = [
            AttributeDef::new("CustomerID", ColumnType::Int),
            AttributeDef::new("Code", ColumnType::Text),
        ];
        let overrides = RecordOverrides {
            primary_key_name: Some("code"),
            entity_name: Some("tblCustomer"),
            primary_key_not_identity: true,
        };
        let c = Classification::from_defs("Customer", &defs, overrides);
        assert_eq!(c.primary_key().map(|a| a.name), Some("Code"));
        assert_eq!(c.attribute_by_name("customerid").map(|a| a.role), Some(Role::DataColumn));
        assert_eq!(c.table(), "tblCustomer");
        assert_eq!(c.entity(), "Customer");
    }

    #[test]
    fn test_attribute_by_name_ignores_case() {
        let c = Classification::from_defs("Customer", &defs(), RecordOverrides::default());
        assert_eq!(c.attribute_by_name("NAME").map(|a| a.name), Some("Name"));
        assert!(c.attribute_by_name("nope").is_none());
    }
}
