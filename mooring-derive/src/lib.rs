//! Procedural macros for the mooring record mapper
//!
//! This crate provides the `Record` derive. Use it through the `mooring` re-export.

mod attributes;
mod macros;

use proc_macro::TokenStream;

/// Derive macro for `Record` - generates the attribute descriptor of a struct
///
/// This macro generates:
/// - `attributes()` (declaration order, types taken from `ColumnValue`)
/// - `overrides()` from `#[table_name]`, `#[primary_key_name]` and
///   `#[primary_key_not_identity]`
/// - name-keyed `get`/`set` for every persisted field
///
/// Field attributes: `#[column_name = "..."]` renames the attribute and
/// `#[read_only]` excludes it from persistence. Fields whose attribute name starts
/// with `Model_` or `Cargo_` are excluded as well and may be of any type.
///
/// The struct must also implement `Default`.
///
/// # Example
///
/// ```ignore
/// use mooring::Record;
///
/// #[derive(Debug, Default, Record)]
/// #[table_name = "tblCustomers"]
/// struct Customer {
///     id_Customer: i32,
///     Name: String,
///     Born: Option<chrono::NaiveDateTime>,
///     Model_Orders: Vec<String>,
/// }
/// ```
#[proc_macro_derive(
    Record,
    attributes(table_name, primary_key_name, primary_key_not_identity, column_name, read_only)
)]
pub fn derive_record(input: TokenStream) -> TokenStream {
    macros::derive_record(input)
}
