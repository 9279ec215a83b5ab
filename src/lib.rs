//! # Mooring
//!
//! Convention-based record mapping for SQL-Server-style stores.
//!
//! A plain struct deriving [`Record`] is mapped by naming convention alone:
//!
//! - `Model_*` / `Cargo_*` attributes and `#[read_only]` fields are never persisted
//! - the first attribute named `id_*`, `*ID` or `*_id` is the primary key
//! - `ref_<Table>_<Column>` attributes select a column of a joined table
//! - everything else is a plain column
//!
//! From that classification the [`SqlGenerator`] writes INSERT/UPDATE/DELETE/SELECT
//! text, and the [`Mapped`] facade runs it through an [`Executor`] and hydrates
//! result rows back into records.
//!
//! ```no_run
//! use mooring::{Mapped, Record};
//! use mooring::test_helpers::ScriptedExecutor;
//!
//! #[derive(Debug, Default, Record)]
//! struct Customer {
//!     id_Customer: i32,
//!     Name: String,
//!     Model_Loaded: bool,
//! }
//!
//! let db = ScriptedExecutor::new().with_scalar(Ok(7));
//! let mut customer = Mapped::new(Customer { Name: "O'Brien".into(), ..Default::default() });
//! customer.add_record(&db);
//! assert_eq!(
//!     db.last_sql().unwrap(),
//!     "INSERT INTO Customer ([Name]) VALUES ('O''Brien'); SELECT SCOPE_IDENTITY();"
//! );
//! ```

extern crate self as mooring;

pub mod access;
pub mod classify;
pub mod config;
pub mod error;
pub mod executor;
pub mod metrics;
pub mod query;
pub mod record;
pub mod row;
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;
pub mod value;

pub use access::{LastError, Mapped};
pub use classify::{classify, AttributeDescriptor, Classification, Role};
pub use config::MappingConfig;
pub use error::{MappingError, Operation};
pub use executor::{ExecError, Executor};
pub use query::{ReferenceColumn, SqlGenerator, Statement, StatementKind};
pub use record::{AttributeDef, Record, RecordOverrides};
pub use row::Row;
pub use value::{ColumnType, ColumnValue, Value};

/// `#[derive(Record)]`
///
/// Field attributes: `#[column_name = "..."]` renames the attribute,
/// `#[read_only]` makes it cargo. Struct attributes: `#[table_name = "..."]`,
/// `#[primary_key_name = "..."]`, `#[primary_key_not_identity]`.
pub use mooring_derive::Record;
