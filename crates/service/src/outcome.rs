//! Per-record outcomes and the run report they aggregate into.

use std::fmt;

use catalog_import_core::{ProgramId, UniversityId};

use crate::error::RecordError;

/// Result of a find-or-create.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution<Id> {
    Existing(Id),
    Created(Id),
}

impl<Id: Copy> Resolution<Id> {
    #[must_use]
    pub fn existed(&self) -> bool {
        matches!(self, Self::Existing(_))
    }

    #[must_use]
    pub fn id(&self) -> Id {
        match *self {
            Self::Existing(id) | Self::Created(id) => id,
        }
    }
}

/// What a processed record resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reconciled {
    pub university: Resolution<UniversityId>,
    pub program: Resolution<ProgramId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    MissingUniversityName,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingUniversityName => f.write_str("missing university_name"),
        }
    }
}

/// Outcome of one record.
#[derive(Debug)]
pub enum RecordOutcome {
    Processed(Reconciled),
    /// Record left out before any database interaction.
    Skipped(SkipReason),
    Failed(RecordError),
}

/// Counts for a finished run.
///
/// `processed + skipped` equals the number of input records. `skipped`
/// includes `failed`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub processed: usize,
    pub skipped: usize,
    pub failed: usize,
    pub universities_created: usize,
    pub programs_created: usize,
    pub programs_existing: usize,
}

impl ImportReport {
    pub(crate) fn tally(&mut self, outcome: &RecordOutcome) {
        match outcome {
            RecordOutcome::Processed(reconciled) => {
                self.processed += 1;
                if !reconciled.university.existed() {
                    self.universities_created += 1;
                }
                if reconciled.program.existed() {
                    self.programs_existing += 1;
                } else {
                    self.programs_created += 1;
                }
            },
            RecordOutcome::Skipped(_) => self.skipped += 1,
            RecordOutcome::Failed(_) => {
                self.skipped += 1;
                self.failed += 1;
            },
        }
    }

    #[must_use]
    pub const fn total(&self) -> usize {
        self.processed + self.skipped
    }
}

impl fmt::Display for ImportReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} processed, {} skipped", self.processed, self.skipped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn processed(university: Resolution<UniversityId>, program: Resolution<ProgramId>) -> RecordOutcome {
        RecordOutcome::Processed(Reconciled { university, program })
    }

    #[test]
    fn tally_counts_each_outcome_kind() {
        let mut report = ImportReport::default();
        report.tally(&processed(Resolution::Created(UniversityId(1)), Resolution::Created(ProgramId(1))));
        report.tally(&processed(Resolution::Existing(UniversityId(1)), Resolution::Existing(ProgramId(1))));
        report.tally(&RecordOutcome::Skipped(SkipReason::MissingUniversityName));
        report.tally(&RecordOutcome::Failed(RecordError::MissingField("name")));

        assert_eq!(
            report,
            ImportReport {
                processed: 2,
                skipped: 2,
                failed: 1,
                universities_created: 1,
                programs_created: 1,
                programs_existing: 1,
            }
        );
        assert_eq!(report.total(), 4);
        assert_eq!(report.to_string(), "2 processed, 2 skipped");
    }

    #[test]
    fn resolution_reports_existence_and_id() {
        assert!(Resolution::Existing(ProgramId(4)).existed());
        assert!(!Resolution::Created(ProgramId(5)).existed());
        assert_eq!(Resolution::Created(ProgramId(5)).id(), ProgramId(5));
    }
}
