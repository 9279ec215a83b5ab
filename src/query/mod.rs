//! SQL statement generation for mapped entities.
//!
//! - **Generator**: [`SqlGenerator`] builds INSERT/UPDATE/DELETE/SELECT text for one
//!   entity type from its [`Classification`](crate::classify::Classification)
//! - **Reference**: decoding of `ref_<Table>_<Column>` attributes and the LEFT JOINs
//!   that back them
//! - **Statement**: SQL text plus `@pN` parameters for the parameterized write path

pub mod generator;
#[doc(inline)]
pub use generator::SqlGenerator;

pub mod reference;
#[doc(inline)]
pub use reference::ReferenceColumn;

pub mod statement;
#[doc(inline)]
pub use statement::{Statement, StatementKind};
