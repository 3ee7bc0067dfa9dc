//! Database errors

use thiserror::Error;

/// Database errors
#[derive(Error, Debug)]
pub enum DbError {
    /// SQLx error
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// Record not found
    #[error("record not found")]
    NotFound,

    /// Uniqueness conflict, e.g. a duplicate (role, identifier) pair
    #[error("uniqueness conflict")]
    Conflict,
}

/// Result alias for database operations
pub type DbResult<T> = Result<T, DbError>;
