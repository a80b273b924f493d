//! Error types for the storage layer.
//!
//! Absence is not an error here: lookups return `Option` and mutations
//! return whether a document matched. Callers decide what "missing" means.

use thiserror::Error;

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database connection or query error.
    #[error("database error: {0}")]
    Connection(#[from] sqlx::Error),

    /// Another user already registered this email.
    #[error("email already registered: {0}")]
    DuplicateEmail(String),

    /// A stored document could not be mapped back to a domain type.
    #[error("invalid stored document: {0}")]
    InvalidDocument(String),

    /// Migration error.
    #[error("migration error: {0}")]
    MigrationError(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    ConfigError(String),
}

impl StoreError {
    /// Maps a unique-violation on the users email index to `DuplicateEmail`.
    pub(crate) fn from_insert_user(err: sqlx::Error, email: &str) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                Self::DuplicateEmail(email.to_string())
            }
            _ => Self::Connection(err),
        }
    }
}

impl From<leaflet_core::PathError> for StoreError {
    fn from(err: leaflet_core::PathError) -> Self {
        Self::InvalidDocument(err.to_string())
    }
}
