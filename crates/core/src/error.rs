//! Unified error types for course-nav.
//!
//! Store and probe failures are logged and degraded by the cache and sweep;
//! only configuration, input and setup errors ever reach a front end.

use rmcp::model::{ErrorCode, ErrorData as McpError};
use tokio_rusqlite::rusqlite;

/// Unified error types for course-nav.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., empty URL).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// Invalid URL.
    #[error("INVALID_URL: {0}")]
    InvalidUrl(String),

    /// The location does not describe a course page.
    #[error("NOT_A_COURSE_PAGE: {0}")]
    NotACoursePage(String),

    /// Durable store could not be read or decoded.
    #[error("STORE_READ_ERROR: {0}")]
    StoreRead(String),

    /// Durable store could not be written.
    #[error("STORE_PERSIST_ERROR: {0}")]
    StorePersist(String),

    /// Existence probe transport failure.
    #[error("PROBE_ERROR: {0}")]
    Probe(String),

    /// Database operation failed.
    #[error("STORE_ERROR: {0}")]
    Database(tokio_rusqlite::Error),

    /// Migration failed to apply.
    #[error("STORE_ERROR: migration failed: {0}")]
    MigrationFailed(String),
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
        Error::Database(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(tokio_rusqlite::Error::Error(err))
    }
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let (code, message) = match &err {
            Error::InvalidInput(msg) => (-32602, msg.clone()),
            Error::InvalidUrl(msg) => (-32003, msg.clone()),
            Error::NotACoursePage(msg) => (-32004, msg.clone()),
            Error::Probe(msg) => (-32008, msg.clone()),
            Error::StoreRead(msg) | Error::StorePersist(msg) | Error::MigrationFailed(msg) => (-32002, msg.clone()),
            Error::Database(e) => (-32002, e.to_string()),
        };

        McpError { code: ErrorCode(code), message: message.into(), data: None }
    }
}
