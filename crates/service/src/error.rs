//! Typed errors for the import service.
//!
//! [`ImportError`] aborts a run. [`RecordError`] is confined to one record
//! and only ever reaches the caller as a counted skip.

use std::path::PathBuf;

use catalog_import_storage::StorageError;
use thiserror::Error;

/// Failure that aborts the whole import run.
#[derive(Debug, Error)]
pub enum ImportError {
    /// Input file does not exist.
    #[error("JSON file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Input is not valid JSON, or not a JSON array.
    #[error("invalid JSON format in {}: {reason}", path.display())]
    Format { path: PathBuf, reason: String },

    /// Input exists but could not be read as UTF-8 text.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Database unreachable, authentication refused, or connection lost mid-run.
    #[error("database connection failed: {0}")]
    Connection(#[source] StorageError),

    /// Transaction control (begin, savepoint, commit) failed.
    #[error("transaction failed: {0}")]
    Storage(#[source] StorageError),
}

impl ImportError {
    /// Classify a storage error raised outside any single record.
    pub fn from_storage(err: StorageError) -> Self {
        if err.is_connection() { Self::Connection(err) } else { Self::Storage(err) }
    }
}

/// Failure confined to one record.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// Element is not an object, or a field has the wrong JSON type.
    #[error("malformed record: {0}")]
    Malformed(#[source] serde_json::Error),

    #[error("storage: {0}")]
    Storage(#[from] StorageError),
}

impl RecordError {
    /// Whether the connection is gone, which makes the failure fatal for the run.
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Storage(e) if e.is_connection())
    }
}
