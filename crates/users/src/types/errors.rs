//! Error types for user and session operations

use thiserror::Error;

/// User lookup error types
#[derive(Error, Debug)]
pub enum UserError {
    #[error("user not found")]
    UserNotFound,

    #[error("database error: {0}")]
    DatabaseError(String),
}

/// Session validation error types
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("invalid session token")]
    InvalidSession,

    #[error("session expired")]
    SessionExpired,

    #[error("database error: {0}")]
    DatabaseError(String),
}

pub type UserResult<T> = Result<T, UserError>;
pub type AuthResult<T> = Result<T, AuthError>;

impl From<reelhub_database::DatabaseError> for UserError {
    fn from(error: reelhub_database::DatabaseError) -> Self {
        UserError::DatabaseError(error.to_string())
    }
}

impl From<reelhub_database::DatabaseError> for AuthError {
    fn from(error: reelhub_database::DatabaseError) -> Self {
        AuthError::DatabaseError(error.to_string())
    }
}
