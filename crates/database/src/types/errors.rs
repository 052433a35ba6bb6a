//! Error types for the database layer

use thiserror::Error;

/// Database error types
#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("migration error: {0}")]
    Migration(String),

    #[error("query error: {0}")]
    Query(String),

    #[error("invalid row data: {0}")]
    InvalidRow(String),
}

impl From<sqlx::Error> for DatabaseError {
    fn from(error: sqlx::Error) -> Self {
        DatabaseError::Query(error.to_string())
    }
}

impl From<uuid::Error> for DatabaseError {
    fn from(error: uuid::Error) -> Self {
        DatabaseError::InvalidRow(format!("malformed uuid column: {error}"))
    }
}
