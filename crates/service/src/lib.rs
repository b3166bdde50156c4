//! Import service for catalog-import
//!
//! Loads a JSON array of program listings and reconciles it against the
//! catalog: find-or-create the university, then find-or-create the program.

#![allow(clippy::missing_errors_doc, reason = "Errors are self-explanatory from Result types")]

mod error;
mod events;
mod importer;
mod loader;
mod outcome;

pub use error::{ImportError, RecordError};
pub use events::{ImportEvents, TracingEvents};
pub use importer::{ImportOptions, Importer, ParseScopeError, TransactionScope};
pub use loader::load;
pub use outcome::{ImportReport, Reconciled, RecordOutcome, Resolution, SkipReason};
