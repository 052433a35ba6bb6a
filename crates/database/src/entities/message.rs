//! Chat message entity definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::UserProfile;
use super::video::Video;

/// A single chat message row. Messages are only ever soft-deleted; the
/// `is_deleted` flag is the one mutable column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub reply_to_id: Option<Uuid>,
    pub mentioned_video_id: Option<Uuid>,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a new chat message.
#[derive(Debug, Clone)]
pub struct NewChatMessage {
    pub user_id: Uuid,
    pub content: String,
    pub reply_to_id: Option<Uuid>,
    pub mentioned_video_id: Option<Uuid>,
}

/// A message hydrated with its sender profile, mentioned video, and the
/// replied-to message (one level deep, with that message's sender).
#[derive(Debug, Clone, PartialEq)]
pub struct MessageWithRelations {
    pub message: ChatMessage,
    pub sender: UserProfile,
    pub mentioned_video: Option<Video>,
    pub reply_to: Option<ReplySnapshot>,
}

/// Snapshot of a replied-to message captured when the reply row is read.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplySnapshot {
    pub message: ChatMessage,
    pub sender: UserProfile,
}
