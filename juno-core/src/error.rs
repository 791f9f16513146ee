//! Error types for juno-core

use thiserror::Error;

/// Main error type for the juno-core library
#[derive(Error, Debug)]
pub enum Error {
    /// Database error
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding of a stored record failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Input rejected before any store write
    #[error("validation failed: {0}")]
    Validation(String),

    /// The underlying key-value storage could not serve the request
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
}

impl Error {
    /// Whether this error was raised by input validation.
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }

    /// Whether this error came from the storage layer.
    ///
    /// Callers surface these to the user and keep their in-memory state.
    pub fn is_store_failure(&self) -> bool {
        matches!(
            self,
            Error::Database(_) | Error::Io(_) | Error::Json(_) | Error::StoreUnavailable(_)
        )
    }
}

/// Result type alias for juno-core
pub type Result<T> = std::result::Result<T, Error>;
