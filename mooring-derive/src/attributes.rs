//! Attribute parsing utilities

use syn::{Attribute, ExprLit, Field, Lit};

/// Name prefixes that make an attribute cargo; kept in step with `mooring::classify`
const RESERVED_PREFIXES: [&str; 2] = ["Model_", "Cargo_"];

/// Extract a `#[name = "value"]` string from a list of attributes
fn extract_str(attrs: &[Attribute], name: &str) -> Option<String> {
    for attr in attrs {
        if attr.path().is_ident(name) {
            if let Ok(meta) = attr.meta.require_name_value() {
                if let syn::Expr::Lit(ExprLit {
                    lit: Lit::Str(s), ..
                }) = &meta.value
                {
                    return Some(s.value());
                }
            }
        }
    }
    None
}

/// Extract table name from struct attributes
pub fn extract_table_name(attrs: &[Attribute]) -> Option<String> {
    extract_str(attrs, "table_name")
}

/// Extract primary key override from struct attributes
pub fn extract_primary_key_name(attrs: &[Attribute]) -> Option<String> {
    extract_str(attrs, "primary_key_name")
}

/// Extract column name from field attributes
pub fn extract_column_name(field: &Field) -> Option<String> {
    extract_str(&field.attrs, "column_name")
}

/// Check if an attribute list carries a marker attribute
pub fn has_marker(attrs: &[Attribute], attr_name: &str) -> bool {
    attrs.iter().any(|attr| attr.path().is_ident(attr_name))
}

/// `Model_`/`Cargo_` prefixed attribute names are never persisted
pub fn is_reserved_name(name: &str) -> bool {
    RESERVED_PREFIXES.iter().any(|prefix| name.starts_with(prefix))
}

/// Parsed per-field mapping attributes
pub struct FieldAttributes {
    /// Attribute name seen by the mapper: `#[column_name]` or the field name
    pub name: String,
    /// `#[read_only]`
    pub read_only: bool,
}

impl FieldAttributes {
    /// Cargo fields get no accessors and need not implement `ColumnValue`
    pub fn is_cargo(&self) -> bool {
        self.read_only || is_reserved_name(&self.name)
    }
}

/// Parse mapping attributes of a named field
pub fn parse_field_attributes(field: &Field, ident: &syn::Ident) -> FieldAttributes {
    let name = extract_column_name(field).unwrap_or_else(|| {
        let raw = ident.to_string();
        raw.strip_prefix("r#").map(str::to_string).unwrap_or(raw)
    });
    FieldAttributes {
        name,
        read_only: has_marker(&field.attrs, "read_only"),
    }
}
