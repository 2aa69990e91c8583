//! Custom error types for the common library
//!
//! This module defines the storage error type shared by the services.

use sqlx::Error as SqlxError;
use thiserror::Error;

/// Custom error type for database operations
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error occurred during database connection
    #[error("Database connection error: {0}")]
    Connection(#[source] SqlxError),

    /// Error occurred during database query execution
    #[error("Database query error: {0}")]
    Query(#[source] SqlxError),

    /// Error occurred during database migration
    #[error("Database migration error: {0}")]
    Migration(String),

    /// Configuration error
    #[error("Database configuration error: {0}")]
    Configuration(String),

    /// A UNIQUE constraint rejected the write
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),
}

impl DatabaseError {
    /// Classify a query failure, separating UNIQUE violations from the rest
    pub fn query(err: SqlxError) -> Self {
        match err.as_database_error() {
            Some(db_err) if db_err.is_unique_violation() => DatabaseError::UniqueViolation(
                db_err.constraint().unwrap_or("unknown").to_string(),
            ),
            _ => DatabaseError::Query(err),
        }
    }

    /// Whether the failed statement violated a UNIQUE constraint
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, DatabaseError::UniqueViolation(_))
    }
}

/// Type alias for Result with DatabaseError
pub type DatabaseResult<T> = Result<T, DatabaseError>;
