//! In-memory catalog with PostgreSQL transaction semantics.
//!
//! Used by tests of the importer. Mirrors the parts of PostgreSQL the
//! importer depends on: unique university names, savepoints, and a
//! transaction that rejects every statement after its first error until it
//! is rolled back. Faults can be injected per program name.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use catalog_import_core::{
    NewProgram, Program, ProgramId, ProgramKey, University, UniversityId,
};

use crate::error::StorageError;
use crate::traits::{CatalogStore, CatalogTx};

#[derive(Debug, Clone, Default)]
struct CatalogState {
    universities: Vec<University>,
    programs: Vec<Program>,
    next_university_id: i32,
    next_program_id: i32,
}

/// Failure injected when a program with a given name is inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// Behaves like a unique-constraint violation.
    Constraint,
    /// Behaves like a dropped connection.
    Connection,
}

#[derive(Debug, Default)]
struct Shared {
    committed: Mutex<CatalogState>,
    faults: Mutex<HashMap<String, Fault>>,
    statements: AtomicUsize,
    writes: AtomicUsize,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    shared: Arc<Shared>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MemoryCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every insert of a program named `program_name`.
    pub fn inject_fault(&self, program_name: &str, fault: Fault) {
        lock(&self.shared.faults).insert(program_name.to_owned(), fault);
    }

    /// Committed universities, in insertion order.
    #[must_use]
    pub fn universities(&self) -> Vec<University> {
        lock(&self.shared.committed).universities.clone()
    }

    /// Committed programs, in insertion order.
    #[must_use]
    pub fn programs(&self) -> Vec<Program> {
        lock(&self.shared.committed).programs.clone()
    }

    /// Statements issued so far, committed or not.
    #[must_use]
    pub fn statement_count(&self) -> usize {
        self.shared.statements.load(Ordering::SeqCst)
    }

    /// Inserts attempted so far, committed or not.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.shared.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalog {
    type Tx = MemoryCatalogTx;

    async fn begin(&self) -> Result<MemoryCatalogTx, StorageError> {
        let state = lock(&self.shared.committed).clone();
        Ok(MemoryCatalogTx {
            shared: Arc::clone(&self.shared),
            state,
            savepoints: Vec::new(),
            aborted: false,
        })
    }
}

#[derive(Debug)]
pub struct MemoryCatalogTx {
    shared: Arc<Shared>,
    state: CatalogState,
    savepoints: Vec<CatalogState>,
    aborted: bool,
}

impl MemoryCatalogTx {
    /// Count a statement and refuse it if the transaction is aborted.
    fn statement(&mut self) -> Result<(), StorageError> {
        self.shared.statements.fetch_add(1, Ordering::SeqCst);
        if self.aborted {
            return Err(StorageError::TransactionAborted(
                "current transaction is aborted, commands ignored until end of transaction block"
                    .to_owned(),
            ));
        }
        Ok(())
    }

    fn fail(&mut self, err: StorageError) -> StorageError {
        self.aborted = true;
        err
    }
}

#[async_trait]
impl CatalogTx for MemoryCatalogTx {
    async fn find_university(
        &mut self,
        name: &str,
    ) -> Result<Option<UniversityId>, StorageError> {
        self.statement()?;
        Ok(self.state.universities.iter().find(|u| u.name == name).map(|u| u.id))
    }

    async fn insert_university(&mut self, name: &str) -> Result<UniversityId, StorageError> {
        self.statement()?;
        self.shared.writes.fetch_add(1, Ordering::SeqCst);
        if self.state.universities.iter().any(|u| u.name == name) {
            return Err(self.fail(StorageError::Duplicate(format!(
                "duplicate key value violates unique constraint \"universities_name_key\": {name}"
            ))));
        }
        self.state.next_university_id += 1;
        let id = UniversityId(self.state.next_university_id);
        self.state.universities.push(University { id, name: name.to_owned() });
        Ok(id)
    }

    async fn find_program(
        &mut self,
        key: &ProgramKey<'_>,
    ) -> Result<Option<ProgramId>, StorageError> {
        self.statement()?;
        Ok(self.state.programs.iter().find(|p| p.matches(key)).map(|p| p.id))
    }

    async fn insert_program(&mut self, program: &NewProgram) -> Result<ProgramId, StorageError> {
        self.statement()?;
        self.shared.writes.fetch_add(1, Ordering::SeqCst);
        let fault = lock(&self.shared.faults).get(&program.name).copied();
        match fault {
            Some(Fault::Constraint) => {
                return Err(self.fail(StorageError::Duplicate(format!(
                    "injected constraint violation for program {}",
                    program.name
                ))));
            },
            Some(Fault::Connection) => {
                return Err(self.fail(StorageError::Database(sqlx::Error::PoolClosed)));
            },
            None => {},
        }
        if !self.state.universities.iter().any(|u| u.id == program.university_id) {
            return Err(self.fail(StorageError::NotFound {
                entity: "university",
                id: program.university_id.to_string(),
            }));
        }
        self.state.next_program_id += 1;
        let id = ProgramId(self.state.next_program_id);
        self.state.programs.push(Program::new(id, program.clone()));
        Ok(id)
    }

    async fn savepoint(&mut self) -> Result<(), StorageError> {
        self.statement()?;
        self.savepoints.push(self.state.clone());
        Ok(())
    }

    async fn release_savepoint(&mut self) -> Result<(), StorageError> {
        self.statement()?;
        self.savepoints.pop();
        Ok(())
    }

    async fn rollback_to_savepoint(&mut self) -> Result<(), StorageError> {
        self.shared.statements.fetch_add(1, Ordering::SeqCst);
        match self.savepoints.pop() {
            Some(snapshot) => {
                self.state = snapshot;
                self.aborted = false;
                Ok(())
            },
            None => Err(StorageError::NotFound { entity: "savepoint", id: "none".to_owned() }),
        }
    }

    async fn commit(self) -> Result<(), StorageError> {
        // COMMIT of an aborted transaction is a rollback in PostgreSQL.
        if !self.aborted {
            *lock(&self.shared.committed) = self.state;
        }
        Ok(())
    }

    async fn rollback(self) -> Result<(), StorageError> {
        Ok(())
    }
}
