//! Storage backend trait abstraction
//!
//! A [`CatalogStore`] hands out transactions; every read and write of an
//! import run goes through one [`CatalogTx`].

use async_trait::async_trait;
use catalog_import_core::{NewProgram, ProgramId, ProgramKey, UniversityId};

use crate::error::StorageError;

/// Source of catalog transactions.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    type Tx: CatalogTx;

    /// Open a transaction.
    async fn begin(&self) -> Result<Self::Tx, StorageError>;
}

/// Catalog operations inside one open transaction.
///
/// Lookups are exact matches. Inserts never update existing rows.
#[async_trait]
pub trait CatalogTx: Send {
    /// Find a university by exact, case-sensitive name.
    async fn find_university(&mut self, name: &str)
    -> Result<Option<UniversityId>, StorageError>;

    /// Insert a university and return its generated id.
    async fn insert_university(&mut self, name: &str) -> Result<UniversityId, StorageError>;

    /// Find a program by `(university_id, name, degree_type)`.
    async fn find_program(&mut self, key: &ProgramKey<'_>)
    -> Result<Option<ProgramId>, StorageError>;

    /// Insert a program row and return its generated id.
    async fn insert_program(&mut self, program: &NewProgram) -> Result<ProgramId, StorageError>;

    /// Mark a point the transaction can roll back to.
    async fn savepoint(&mut self) -> Result<(), StorageError>;

    /// Keep everything done since the last savepoint.
    async fn release_savepoint(&mut self) -> Result<(), StorageError>;

    /// Discard everything done since the last savepoint, including an aborted state.
    async fn rollback_to_savepoint(&mut self) -> Result<(), StorageError>;

    async fn commit(self) -> Result<(), StorageError>;

    async fn rollback(self) -> Result<(), StorageError>;
}
