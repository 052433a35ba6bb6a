//! # Reelhub Chat Crate
//!
//! Core business logic for the community chat: message sending with reply
//! and video-mention enrichment, history reads, moderation (bans, soft
//! deletes), and the store traits the gateway and repositories meet at.
//!
//! ## Architecture
//!
//! - **Stores**: traits over the persistence collaborators
//! - **Services**: business logic layer
//! - **Types**: response DTOs and errors
//! - **Utils**: validation and display helpers

pub mod services;
pub mod stores;
pub mod types;
pub mod utils;

// Re-export main types for convenience
pub use services::{ChatService, ModerationService, SendMessageRequest};
pub use stores::{BanStore, MessageStore, VideoLookup};
pub use types::{
    errors::{ChatError, ChatResult},
    responses::{ChatMessageView, ChatUserInfo, ChatVideoInfo},
};
pub use utils::badges::level_badge;
