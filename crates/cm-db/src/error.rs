//! Error types for cm-db

use thiserror::Error;

/// Database session errors
#[derive(Error, Debug)]
pub enum DbError {
    /// Connection error (D001)
    #[error("[D001] Database connection failed: {0}")]
    ConnectionError(String),

    /// Statement execution error (D002)
    #[error("[D002] Statement execution failed: {message}\n  statement: {statement}")]
    ExecutionError { statement: String, message: String },

    /// Statement ran but the database did not apply it (D003)
    #[error("[D003] Statement was not applied: {statement}")]
    NotApplied { statement: String },

    /// Statement exceeded its timeout (D004)
    #[error("[D004] Statement timed out after {timeout_ms} ms: {statement}")]
    Timeout { statement: String, timeout_ms: u128 },

    /// Not implemented (D005)
    #[error("[D005] Feature not implemented for {backend}: {feature}")]
    NotImplemented { backend: String, feature: String },

    /// Mutex poisoned (D006)
    #[error("[D006] Database mutex poisoned: {0}")]
    MutexPoisoned(String),

    /// Session used after close (D007)
    #[error("[D007] Database session is closed")]
    SessionClosed,

    /// Closing the session failed (D008)
    #[error("[D008] Failed to close database session: {0}")]
    CloseError(String),

    /// Internal error (D009)
    #[error("[D009] Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Execution error for `statement` from any driver error.
    pub fn execution(statement: &str, err: impl std::fmt::Display) -> Self {
        DbError::ExecutionError {
            statement: statement.to_string(),
            message: err.to_string(),
        }
    }
}

/// Result type alias for DbError
pub type DbResult<T> = Result<T, DbError>;
