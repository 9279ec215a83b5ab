//! Reference columns: `ref_<ForeignTable>_<ForeignColumn>` attributes that pull a
//! column of another table into the select list, plus the LEFT JOIN that makes
//! the foreign table visible.

use crate::classify::{AttributeDescriptor, Classification, Role};
use crate::error::MappingError;

/// A decoded reference attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceColumn<'a> {
    pub table: &'a str,
    pub column: &'a str,
}

impl<'a> ReferenceColumn<'a> {
    /// Decode `ref_<Table>_<Column>`
    ///
    /// The column part keeps any further underscores. Fewer than three segments,
    /// or an empty table or column, is an error.
    pub fn decode(name: &'a str) -> Result<Self, MappingError> {
        let invalid = |reason: &str| MappingError::InvalidReference {
            attribute: name.to_string(),
            reason: reason.to_string(),
        };

        let mut parts = name.splitn(3, '_');
        let (_prefix, table, column) = match (parts.next(), parts.next(), parts.next()) {
            (Some(prefix), Some(table), Some(column)) => (prefix, table, column),
            _ => return Err(invalid("expected ref_<ForeignTable>_<ForeignColumn>")),
        };

        if table.is_empty() {
            return Err(invalid("foreign table name is empty"));
        }
        if column.is_empty() {
            return Err(invalid("foreign column name is empty"));
        }

        Ok(Self { table, column })
    }

    /// `Ref_<Table>_<Column>`
    #[must_use]
    pub fn alias(&self) -> String {
        format!("Ref_{}_{}", self.table, self.column)
    }

    /// `<Table>.[<Column>] AS Ref_<Table>_<Column>`
    #[must_use]
    pub fn select_fragment(&self) -> String {
        format!("{}.[{}] AS {}", self.table, self.column, self.alias())
    }
}

/// The local attribute holding the foreign table's key: `id_F`, `F_id` or `FID`
/// (any case), never a reference or cargo attribute
#[must_use]
pub fn join_key<'c>(
    classification: &'c Classification,
    foreign_table: &str,
) -> Option<&'c AttributeDescriptor> {
    let candidates = [
        format!("id_{foreign_table}"),
        format!("{foreign_table}_id"),
        format!("{foreign_table}ID"),
    ];
    classification.data_without_refs().find(|attr| {
        candidates
            .iter()
            .any(|candidate| attr.name.eq_ignore_ascii_case(candidate))
    })
}

/// One `LEFT JOIN` clause per distinct foreign table, in first-reference order
pub fn join_clauses(classification: &Classification) -> Result<Vec<String>, MappingError> {
    let table = classification.table();
    let mut joined: Vec<&str> = Vec::new();
    let mut clauses = Vec::new();

    for attr in classification.all().filter(|a| a.role == Role::Reference) {
        let reference = ReferenceColumn::decode(attr.name)?;
        if joined
            .iter()
            .any(|t| t.eq_ignore_ascii_case(reference.table))
        {
            continue;
        }
        if reference.table.eq_ignore_ascii_case(table) {
            return Err(MappingError::InvalidReference {
                attribute: attr.name.to_string(),
                reason: format!("{table} cannot reference its own table"),
            });
        }

        let key = join_key(classification, reference.table).ok_or_else(|| {
            MappingError::InvalidReference {
                attribute: attr.name.to_string(),
                reason: format!(
                    "no join attribute id_{f}, {f}_id or {f}ID on {table}",
                    f = reference.table
                ),
            }
        })?;

        clauses.push(format!(
            "LEFT JOIN {f} ON {table}.[{k}] = {f}.[{k}]",
            f = reference.table,
            k = key.name
        ));
        joined.push(reference.table);
    }

    Ok(clauses)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{AttributeDef, RecordOverrides};
    use crate::value::ColumnType;

    #[test]
    fn test_decode_keeps_underscores_in_column() {
        let r = ReferenceColumn::decode("ref_Orders_Customer_Name").unwrap();
        assert_eq!(r.table, "Orders");
        assert_eq!(r.column, "Customer_Name");
        assert_eq!(
            r.select_fragment(),
            "Orders.[Customer_Name] AS Ref_Orders_Customer_Name"
        );
    }

    #[test]
    fn test_decode_rejects_malformed_names() {
        for name in ["ref_Orders", "ref__Name", "ref_Orders_", "REF"] {
            assert!(
                matches!(ReferenceColumn::decode(name), Err(MappingError::InvalidReference { .. })),
                "{name} should not decode"
            );
        }
    }

    #[test]
    fn test_join_key_conventions() {
        for key in ["id_Orders", "ORDERS_ID", "OrdersID"] {
            let c = Classification::from_defs(
                "Invoice",
                &[
                    AttributeDef::new("id_Invoice", ColumnType::Int),
                    AttributeDef::new(key, ColumnType::Int),
                    AttributeDef::new("ref_Orders_Total", ColumnType::Decimal),
                ],
                RecordOverrides::default(),
            );
            let joins = join_clauses(&c).unwrap();
            assert_eq!(joins, vec![format!("LEFT JOIN Orders ON Invoice.[{key}] = Orders.[{key}]")]);
        }
    }

    #[test]
    fn test_one_join_per_foreign_table() {
        let c = Classification::from_defs(
            "Invoice",
            &[
                AttributeDef::new("id_Invoice", ColumnType::Int),
                AttributeDef::new("id_Customer", ColumnType::Int),
                AttributeDef::new("ref_Customer_Name", ColumnType::Text),
                AttributeDef::new("ref_Customer_City", ColumnType::Text),
            ],
            RecordOverrides::default(),
        );
        assert_eq!(join_clauses(&c).unwrap().len(), 1);
    }

    #[test]
    fn test_missing_join_key_is_reported() {
        let c = Classification::from_defs(
            "Invoice",
            &[
                AttributeDef::new("id_Invoice", ColumnType::Int),
                AttributeDef::new("ref_Orders_Total", ColumnType::Decimal),
            ],
            RecordOverrides::default(),
        );
        assert!(matches!(
            join_clauses(&c),
            Err(MappingError::InvalidReference { attribute, .. }) if attribute == "ref_Orders_Total"
        ));
    }

    #[test]
    fn test_cargo_attribute_is_not_a_join_key() {
        let c = Classification::from_defs(
            "Invoice",
            &[
                AttributeDef::new("id_Invoice", ColumnType::Int),
                AttributeDef::new("id_Orders", ColumnType::Int).read_only(),
                AttributeDef::new("ref_Orders_Total", ColumnType::Decimal),
            ],
            RecordOverrides::default(),
        );
        assert!(join_clauses(&c).is_err());
    }
}
