//! Error types for the chat domain

use thiserror::Error;

/// Chat error types
#[derive(Error, Debug)]
pub enum ChatError {
    #[error("{0}")]
    Validation(String),

    #[error("you are banned from chat")]
    Banned,

    #[error("message not found")]
    MessageNotFound,

    #[error("you can only delete your own messages")]
    NotMessageOwner,

    #[error("storage error: {0}")]
    Storage(String),
}

/// Result type for chat operations
pub type ChatResult<T> = Result<T, ChatError>;

impl From<reelhub_database::DatabaseError> for ChatError {
    fn from(error: reelhub_database::DatabaseError) -> Self {
        ChatError::Storage(error.to_string())
    }
}
