//! Shared chat types: errors and response DTOs.

pub mod errors;
pub mod responses;

pub use errors::{ChatError, ChatResult};
pub use responses::{ChatMessageView, ChatUserInfo, ChatVideoInfo};
