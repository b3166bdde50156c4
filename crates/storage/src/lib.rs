//! Storage layer for catalog-import
//!
//! The importer talks to the database through [`CatalogStore`] and
//! [`CatalogTx`]; [`PgCatalog`] is the PostgreSQL implementation.

mod error;
#[cfg(any(test, feature = "memory"))]
pub mod memory;
mod pg_catalog;
pub mod traits;

pub use error::StorageError;
#[cfg(any(test, feature = "memory"))]
pub use memory::MemoryCatalog;
pub use pg_catalog::{PgCatalog, PgCatalogTx};
pub use traits::{CatalogStore, CatalogTx};
