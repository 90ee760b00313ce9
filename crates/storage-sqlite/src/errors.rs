//! Storage-specific error types for SQLite operations.
//!
//! This module wraps Diesel and r2d2 errors and converts them to the sink
//! error types defined in `fundledger_core`.

use diesel::result::Error as DieselError;
use fundledger_core::errors::{Error, SinkError};
use thiserror::Error;

/// Name reported for every failure of the SQLite sink.
pub const SINK_NAME: &str = "sqlite";

/// Storage-specific errors that wrap Diesel and r2d2 types.
///
/// These errors are internal to the storage layer and are converted to
/// `fundledger_core::Error` before being returned to callers.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database connection failed: {0}")]
    ConnectionFailed(#[from] diesel::ConnectionError),

    #[error("Connection pool error: {0}")]
    PoolError(#[from] r2d2::Error),

    #[error("Query execution failed: {0}")]
    QueryFailed(#[from] DieselError),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Stored value could not be decoded: {0}")]
    Decode(String),
}

/// Result type for storage-internal operations.
pub type StorageResult<T> = std::result::Result<T, StorageError>;

impl From<StorageError> for Error {
    fn from(err: StorageError) -> Self {
        let message = err.to_string();
        match err {
            StorageError::ConnectionFailed(_)
            | StorageError::PoolError(_)
            | StorageError::MigrationFailed(_)
            | StorageError::Io(_) => Error::Sink(SinkError::Unavailable {
                sink: SINK_NAME.to_string(),
                message,
            }),
            StorageError::QueryFailed(_) | StorageError::Decode(_) => {
                Error::Sink(SinkError::Write {
                    sink: SINK_NAME.to_string(),
                    message,
                })
            }
        }
    }
}

/// Extension trait to convert Diesel errors to core errors.
///
/// Since we can't implement `From<DieselError> for Error` due to orphan rules,
/// this trait provides a method to perform the conversion.
pub trait IntoCore<T> {
    fn into_core(self) -> fundledger_core::Result<T>;
}

impl<T> IntoCore<T> for std::result::Result<T, DieselError> {
    fn into_core(self) -> fundledger_core::Result<T> {
        self.map_err(|e| StorageError::from(e).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_failures_become_sink_write_errors() {
        let err: Error = StorageError::QueryFailed(DieselError::NotFound).into();
        assert!(matches!(
            err,
            Error::Sink(SinkError::Write { ref sink, .. }) if sink == SINK_NAME
        ));
    }

    #[test]
    fn migration_failures_mark_the_sink_unavailable() {
        let err: Error = StorageError::MigrationFailed("boom".into()).into();
        assert!(matches!(err, Error::Sink(SinkError::Unavailable { .. })));
    }
}
