//! Find-or-create reconciliation of input records against the catalog.

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use catalog_import_core::{NewProgram, ProgramId, ProgramKey, ProgramRecord, UniversityId};
use catalog_import_storage::{CatalogStore, CatalogTx, StorageError};
use serde_json::Value;
use thiserror::Error;

use crate::error::{ImportError, RecordError};
use crate::events::ImportEvents;
use crate::loader::load;
use crate::outcome::{ImportReport, Reconciled, RecordOutcome, Resolution, SkipReason};

/// How record failures interact with the run transaction.
///
/// Both scopes run the whole import in one transaction that commits at the end.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TransactionScope {
    /// Each record runs inside a savepoint. A failed record is rolled back on
    /// its own and later records are unaffected.
    #[default]
    Savepoint,
    /// No savepoints. A failed record's earlier inserts stay pending, and on
    /// PostgreSQL a failed statement aborts the transaction, so every later
    /// record fails and the final commit is turned into a rollback.
    Run,
}

impl TransactionScope {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Savepoint => "savepoint",
            Self::Run => "run",
        }
    }
}

impl fmt::Display for TransactionScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown transaction scope: {0} (expected savepoint or run)")]
pub struct ParseScopeError(String);

impl FromStr for TransactionScope {
    type Err = ParseScopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "savepoint" => Ok(Self::Savepoint),
            "run" => Ok(Self::Run),
            other => Err(ParseScopeError(other.to_owned())),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportOptions {
    pub scope: TransactionScope,
    /// Roll back instead of committing.
    pub dry_run: bool,
}

pub struct Importer<S: CatalogStore> {
    store: S,
    events: Arc<dyn ImportEvents>,
    options: ImportOptions,
}

impl<S: CatalogStore> Importer<S> {
    #[must_use]
    pub fn new(store: S, events: Arc<dyn ImportEvents>) -> Self {
        Self { store, events, options: ImportOptions::default() }
    }

    #[must_use]
    pub fn with_options(self, options: ImportOptions) -> Self {
        Self { options, ..self }
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Load `path` and import every record in it.
    pub async fn import_file(&self, path: &Path) -> Result<ImportReport, ImportError> {
        let records = load(path)?;
        self.events.records_loaded(path, records.len());
        self.import_records(records).await
    }

    /// Import already-loaded records, in order, inside one transaction.
    ///
    /// Record failures are counted as skips. Connection loss and transaction
    /// control failures abort the run; the transaction is then dropped, which
    /// rolls it back.
    pub async fn import_records(&self, records: Vec<Value>) -> Result<ImportReport, ImportError> {
        let mut tx = self.store.begin().await.map_err(ImportError::from_storage)?;
        let mut report = ImportReport::default();

        for (index, value) in records.into_iter().enumerate() {
            let outcome = match ProgramRecord::from_value(value) {
                Ok(record) => {
                    let outcome = self.run_record(&mut tx, &record).await?;
                    self.report_outcome(index, Some(record.label()), &outcome);
                    outcome
                },
                Err(err) => {
                    let outcome = RecordOutcome::Failed(RecordError::Malformed(err));
                    self.report_outcome(index, None, &outcome);
                    outcome
                },
            };
            report.tally(&outcome);
        }

        let committed = !self.options.dry_run;
        if committed {
            tx.commit().await.map_err(ImportError::from_storage)?;
        } else {
            tx.rollback().await.map_err(ImportError::from_storage)?;
        }
        self.events.run_finished(&report, committed);
        Ok(report)
    }

    /// Process one record under the configured transaction scope.
    async fn run_record(
        &self,
        tx: &mut S::Tx,
        record: &ProgramRecord,
    ) -> Result<RecordOutcome, ImportError> {
        match self.options.scope {
            TransactionScope::Run => fatal(self.process_record(tx, record).await),
            TransactionScope::Savepoint => {
                tx.savepoint().await.map_err(ImportError::from_storage)?;
                let outcome = fatal(self.process_record(tx, record).await)?;
                if matches!(outcome, RecordOutcome::Failed(_)) {
                    tx.rollback_to_savepoint().await.map_err(ImportError::from_storage)?;
                } else {
                    tx.release_savepoint().await.map_err(ImportError::from_storage)?;
                }
                Ok(outcome)
            },
        }
    }

    /// Reconcile one record: university first, then program.
    pub async fn process_record(&self, tx: &mut S::Tx, record: &ProgramRecord) -> RecordOutcome {
        let Some(university_name) = record.university_name() else {
            return RecordOutcome::Skipped(SkipReason::MissingUniversityName);
        };
        match self.reconcile(tx, university_name, record).await {
            Ok(reconciled) => RecordOutcome::Processed(reconciled),
            Err(err) => RecordOutcome::Failed(err),
        }
    }

    async fn reconcile(
        &self,
        tx: &mut S::Tx,
        university_name: &str,
        record: &ProgramRecord,
    ) -> Result<Reconciled, RecordError> {
        let university = self.resolve_university(tx, university_name).await?;
        let name = record.name.as_deref().ok_or(RecordError::MissingField("name"))?;
        let key = ProgramKey::new(university.id(), name, record.lookup_degree_type());
        let program = self.resolve_program(tx, &key, record).await?;
        Ok(Reconciled { university, program })
    }

    /// Find a university by exact name, creating it if absent.
    pub async fn resolve_university(
        &self,
        tx: &mut S::Tx,
        name: &str,
    ) -> Result<Resolution<UniversityId>, StorageError> {
        if let Some(id) = tx.find_university(name).await? {
            self.events.university_found(name, id);
            return Ok(Resolution::Existing(id));
        }
        let id = tx.insert_university(name).await?;
        self.events.university_created(name, id);
        Ok(Resolution::Created(id))
    }

    /// Find a program by `key`, creating it from `record` if absent.
    ///
    /// An existing row is never updated, even if `record` differs from it.
    pub async fn resolve_program(
        &self,
        tx: &mut S::Tx,
        key: &ProgramKey<'_>,
        record: &ProgramRecord,
    ) -> Result<Resolution<ProgramId>, StorageError> {
        if let Some(id) = tx.find_program(key).await? {
            self.events.program_exists(key.name, id);
            return Ok(Resolution::Existing(id));
        }
        let row = NewProgram::from_record(key.university_id, key.name, record);
        let id = tx.insert_program(&row).await?;
        self.events.program_created(key.name, id, key.university_id);
        Ok(Resolution::Created(id))
    }

    fn report_outcome(&self, index: usize, program: Option<&str>, outcome: &RecordOutcome) {
        match outcome {
            RecordOutcome::Processed(_) => {},
            RecordOutcome::Skipped(reason) => {
                self.events.record_skipped(index, program.unwrap_or_default(), *reason);
            },
            RecordOutcome::Failed(err) => self.events.record_failed(index, program, err),
        }
    }
}

/// Promote a lost connection from a record failure to a run failure.
fn fatal(outcome: RecordOutcome) -> Result<RecordOutcome, ImportError> {
    match outcome {
        RecordOutcome::Failed(RecordError::Storage(err)) if err.is_connection() => {
            Err(ImportError::Connection(err))
        },
        other => Ok(other),
    }
}
