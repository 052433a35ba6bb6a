//! Inbound message validation.

use crate::types::errors::{ChatError, ChatResult};

pub const MAX_MESSAGE_LENGTH: usize = 1000;

/// Validate chat message content: 1 to 1000 characters.
pub fn validate_message_content(content: &str) -> ChatResult<()> {
    if content.is_empty() {
        return Err(ChatError::Validation("message content is empty".to_string()));
    }

    let length = content.chars().count();
    if length > MAX_MESSAGE_LENGTH {
        return Err(ChatError::Validation(format!(
            "message content exceeds {MAX_MESSAGE_LENGTH} characters"
        )));
    }

    Ok(())
}
