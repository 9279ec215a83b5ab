//! Value model shared by classification, SQL generation and hydration.
//!
//! - [`types`]: [`ColumnType`], the dynamically-typed [`Value`] and the
//!   [`ColumnValue`] bridge between Rust field types and values
//! - [`coerce`]: stored → typed conversion applied while hydrating rows
//! - [`literal`]: typed → SQL literal serialization

pub mod coerce;
pub mod literal;
pub mod types;

pub use coerce::{default_for, stored_to_typed};
pub use literal::{clamp_value, to_literal};
pub use types::{ColumnType, ColumnValue, Value};
