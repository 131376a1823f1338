//! Audit store error types.

use thiserror::Error;

/// Audit persistence error.
#[derive(Error, Debug)]
pub enum AuditError {
    /// SQLite error
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Executor/connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Migration error
    #[error("Migration error: {0}")]
    Migration(String),

    /// A stored row that no longer parses
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using AuditError.
pub type AuditResult<T> = Result<T, AuditError>;
