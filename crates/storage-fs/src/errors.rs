//! Storage-specific error types for file operations.
//!
//! These errors wrap calamine, rust_xlsxwriter and io errors and are
//! converted to the categories of `fundledger_core::Error` at the crate
//! boundary, together with the path they concern.

use std::path::Path;
use thiserror::Error;

use fundledger_core::errors::{Error, ExtractionError, PersistenceError, SinkError};

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Spreadsheet could not be parsed: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("Spreadsheet could not be written: {0}")]
    SpreadsheetWrite(#[from] rust_xlsxwriter::XlsxError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Unexpected layout: {0}")]
    Layout(String),
}

impl StorageError {
    pub(crate) fn into_extraction(self) -> Error {
        Error::Extraction(ExtractionError::Unreadable(self.to_string()))
    }

    pub(crate) fn into_read(self, path: &Path) -> Error {
        Error::Persistence(PersistenceError::Read {
            path: path.display().to_string(),
            message: self.to_string(),
        })
    }

    pub(crate) fn into_write(self, path: &Path) -> Error {
        Error::Persistence(PersistenceError::Write {
            path: path.display().to_string(),
            message: self.to_string(),
        })
    }

    pub(crate) fn into_sink(self, sink: &str) -> Error {
        Error::Sink(SinkError::Write {
            sink: sink.to_string(),
            message: self.to_string(),
        })
    }
}

pub type StorageResult<T> = std::result::Result<T, StorageError>;
