//! Error types for Journal core operations.
//!
//! Expected outcomes such as a wrong PIN or an empty export range are not
//! errors; they are reported through return values. Everything here is a
//! rejected write or an infrastructure failure.

use thiserror::Error;

/// Result type alias for Journal operations.
pub type Result<T> = std::result::Result<T, JournalError>;

/// Core error type for Journal operations.
#[derive(Debug, Error)]
pub enum JournalError {
    /// Field validation failed (length, required-ness)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Storage backend error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid caller input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration could not be read, parsed or written
    #[error("Configuration error: {0}")]
    Config(String),

    /// PDF layout or serialization failed
    #[error("Export error: {0}")]
    Export(String),

    /// Generic error (fallback)
    #[error("{0}")]
    Other(String),
}

impl From<std::io::Error> for JournalError {
    fn from(err: std::io::Error) -> Self {
        JournalError::Storage(err.to_string())
    }
}

impl From<rusqlite::Error> for JournalError {
    fn from(err: rusqlite::Error) -> Self {
        JournalError::Storage(format!("SQLite error: {}", err))
    }
}

impl From<toml::de::Error> for JournalError {
    fn from(err: toml::de::Error) -> Self {
        JournalError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for JournalError {
    fn from(err: toml::ser::Error) -> Self {
        JournalError::Config(err.to_string())
    }
}
