//! Chat domain services.

pub mod chat_service;
pub mod moderation_service;

#[cfg(test)]
pub mod mock_stores;

pub use chat_service::{ChatService, SendMessageRequest};
pub use moderation_service::ModerationService;
