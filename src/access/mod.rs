//! Record access: CRUD orchestration over classifier, generator and executor.
//!
//! [`crud`] holds the `Result`-returning operations. [`Mapped`] wraps a record and
//! exposes the same operations as success flags with a retained last error.

pub mod crud;
pub mod mapped;

#[doc(inline)]
pub use crud::{delete, find_by_primary_key, hydrate, insert, populate, select, update};
#[doc(inline)]
pub use mapped::{LastError, Mapped};
