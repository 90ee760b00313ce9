//! Core error types for the Fundledger pipeline.
//!
//! This module defines storage-agnostic error types. Spreadsheet, file and
//! database errors are converted to these types by the storage crates.

use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the ingestion pipeline.
///
/// Each variant maps to one category of the failure taxonomy so callers at
/// the request boundary can decide on a status without string matching.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid upload: {0}")]
    Input(#[from] InputError),

    #[error("Extraction failed: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("Merge failed: {0}")]
    Merge(#[from] MergeError),

    #[error("Persistence failed: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("Sink failed: {0}")]
    Sink(#[from] SinkError),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl Error {
    /// True when the caller can fix the problem by sending a different upload.
    pub fn is_user_correctable(&self) -> bool {
        matches!(self, Error::Input(_))
    }
}

/// Missing or empty upload input.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum InputError {
    #[error("No file part")]
    MissingFile,

    #[error("No selected file")]
    EmptyFilename,

    #[error("Uploaded file '{0}' is empty")]
    EmptyFile(String),

    #[error("Invalid file name '{0}'")]
    InvalidFilename(String),

    #[error("File name '{0}' is reserved for the master table")]
    ReservedFilename(String),
}

/// Errors raised while turning a raw workbook into a snapshot.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("Worksheet '{sheet}' not found (available: {})", available.join(", "))]
    SheetNotFound {
        sheet: String,
        available: Vec<String>,
    },

    #[error("File could not be read as a spreadsheet: {0}")]
    Unreadable(String),

    #[error("Worksheet '{sheet}' has {found} columns, schema '{schema}' needs at least {required}")]
    TooFewColumns {
        schema: String,
        sheet: String,
        required: usize,
        found: usize,
    },

    #[error("Worksheet '{sheet}' contains no holdings rows for schema '{schema}'")]
    NoRecords { schema: String, sheet: String },
}

/// Errors raised while joining a snapshot into the master table.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum MergeError {
    #[error("Key column '{column}' is missing from the {side}")]
    MissingKeyColumn { column: String, side: String },

    #[error("Row {row} of the master table has no security name")]
    MissingKeyValue { row: usize },

    #[error("Security '{0}' appears more than once in the master table")]
    DuplicateKey(String),

    #[error("Column '{0}' already exists in the master table")]
    ColumnExists(String),

    #[error("Row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// Master table could not be read or written.
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("Failed to read master table at {path}: {message}")]
    Read { path: String, message: String },

    #[error("Failed to write master table at {path}: {message}")]
    Write { path: String, message: String },

    #[error("Failed to store upload '{name}': {message}")]
    Upload { name: String, message: String },
}

/// Failure of an optional secondary sink.
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("Sink '{sink}' is unavailable: {message}")]
    Unavailable { sink: String, message: String },

    #[error("Sink '{sink}' rejected the snapshot: {message}")]
    Write { sink: String, message: String },
}
