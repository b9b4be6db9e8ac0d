//! Unified error types for the contact book.
//!
//! Storage operations classify driver failures into uniqueness violations
//! and generic storage faults; the `ContactStore` boundary turns both into
//! sentinel return values.

use tokio_rusqlite::rusqlite;
use tokio_rusqlite::rusqlite::ffi;

/// Unified error types for the contact book core.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., an empty email).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// A write would duplicate an existing unique email or phone number.
    #[error("UNIQUENESS_VIOLATION: {0}")]
    UniquenessViolation(String),

    /// Database operation failed.
    #[error("STORAGE_FAULT: {0}")]
    Database(tokio_rusqlite::Error),

    /// Schema creation failed.
    #[error("STORAGE_FAULT: schema setup failed: {0}")]
    SchemaFailed(String),
}

impl Error {
    /// Whether this error is a rejected duplicate rather than a fault.
    pub fn is_uniqueness_violation(&self) -> bool {
        matches!(self, Error::UniquenessViolation(_))
    }
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
            tokio_rusqlite::Error::Close(c) => Error::Database(tokio_rusqlite::Error::Close(c)),
            _ => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => Error::from(e),
            other => Error::Database(other),
        }
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(failure, message) = &err
            && matches!(failure.extended_code, ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY)
        {
            return Error::UniquenessViolation(message.clone().unwrap_or_else(|| failure.to_string()));
        }
        Error::Database(tokio_rusqlite::Error::Error(err))
    }
}
