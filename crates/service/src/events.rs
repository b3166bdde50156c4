//! Audit trail of an import run.
//!
//! The importer reports every creation, every existing match, every skip and
//! every failure through an [`ImportEvents`] passed in at construction.

use std::path::Path;

use catalog_import_core::{ProgramId, UniversityId, UNKNOWN_PROGRAM_LABEL};

use crate::error::RecordError;
use crate::outcome::{ImportReport, SkipReason};

pub trait ImportEvents: Send + Sync {
    fn records_loaded(&self, path: &Path, count: usize);

    fn university_found(&self, name: &str, id: UniversityId);

    fn university_created(&self, name: &str, id: UniversityId);

    fn program_exists(&self, name: &str, id: ProgramId);

    fn program_created(&self, name: &str, id: ProgramId, university_id: UniversityId);

    /// `index` is the record's zero-based position in the input array.
    fn record_skipped(&self, index: usize, program: &str, reason: SkipReason);

    /// `program` is `None` when the record could not be read at all.
    fn record_failed(&self, index: usize, program: Option<&str>, error: &RecordError);

    /// `committed` is false for dry runs.
    fn run_finished(&self, report: &ImportReport, committed: bool);
}

/// Structured `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEvents;

impl ImportEvents for TracingEvents {
    fn records_loaded(&self, path: &Path, count: usize) {
        tracing::info!(path = %path.display(), count, "Loaded entries");
    }

    fn university_found(&self, name: &str, id: UniversityId) {
        tracing::info!(name, id = id.0, "Found existing university");
    }

    fn university_created(&self, name: &str, id: UniversityId) {
        tracing::info!(name, id = id.0, "Created university");
    }

    fn program_exists(&self, name: &str, id: ProgramId) {
        tracing::info!(name, id = id.0, "Program already exists");
    }

    fn program_created(&self, name: &str, id: ProgramId, university_id: UniversityId) {
        tracing::info!(name, id = id.0, university_id = university_id.0, "Created program");
    }

    fn record_skipped(&self, index: usize, program: &str, reason: SkipReason) {
        tracing::warn!(index, program, %reason, "Skipping entry");
    }

    fn record_failed(&self, index: usize, program: Option<&str>, error: &RecordError) {
        tracing::error!(
            index,
            program = program.unwrap_or(UNKNOWN_PROGRAM_LABEL),
            %error,
            "Failed to process entry"
        );
    }

    fn run_finished(&self, report: &ImportReport, committed: bool) {
        tracing::info!(
            processed = report.processed,
            skipped = report.skipped,
            failed = report.failed,
            universities_created = report.universities_created,
            programs_created = report.programs_created,
            programs_existing = report.programs_existing,
            "Import completed"
        );
        if !committed {
            tracing::warn!("Dry run: transaction rolled back, no changes were saved");
        }
    }
}
