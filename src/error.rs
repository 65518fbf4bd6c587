//! Error types for record normalization and dataset coordination.

use std::path::PathBuf;
use thiserror::Error;

/// Failure to turn a single raw row field into a typed value.
///
/// These never abort a load; the loader skips (or, for counts, flags) the
/// row and keeps going.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("malformed industry classification: {value:?}")]
    MalformedCategory { value: String },

    #[error("invalid occurrence date: {value:?}")]
    InvalidDate { value: String },

    #[error("invalid victim count: {value:?}")]
    InvalidCount { value: String },
}

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("start year {start} is after end year {end}")]
    InvalidRange { start: i32, end: i32 },

    #[error("failed to load source {path}: {reason}")]
    SourceLoadFailure { path: PathBuf, reason: String },

    #[error("no source files configured")]
    NoSources,
}

impl DatasetError {
    pub fn source_load(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        DatasetError::SourceLoadFailure {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

/// Failure writing rendered tables to disk.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DatasetError>;
