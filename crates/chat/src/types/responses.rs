//! Response DTOs for chat messages as they appear on the wire.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use reelhub_database::{MessageWithRelations, ReplySnapshot, UserProfile, Video};

use crate::utils::badges::level_badge;

/// Display snapshot of a chat participant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatUserInfo {
    pub id: Uuid,
    pub username: String,
    pub display_name: String,
    pub level: i64,
    pub level_badge: String,
    pub avatar: String,
}

impl ChatUserInfo {
    pub fn from_profile(profile: &UserProfile) -> Self {
        Self {
            id: profile.id,
            username: profile.username.clone(),
            display_name: profile.display_name.clone(),
            level: profile.level,
            level_badge: level_badge(profile.level).to_string(),
            avatar: profile.avatar_url.clone().unwrap_or_default(),
        }
    }
}

/// A video referenced from a chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatVideoInfo {
    pub id: Uuid,
    pub code: String,
    pub title: String,
    pub thumbnail: String,
}

impl ChatVideoInfo {
    pub fn from_video(video: &Video) -> Self {
        Self {
            id: video.id,
            code: extract_video_code(&video.title).to_string(),
            title: video.title.clone(),
            thumbnail: video.thumbnail.clone().unwrap_or_default(),
        }
    }
}

/// A chat message as broadcast to clients and returned from history reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessageView {
    pub id: Uuid,
    pub user: ChatUserInfo,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mentioned_video: Option<ChatVideoInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<Box<ChatMessageView>>,
    pub created_at: DateTime<Utc>,
}

impl ChatMessageView {
    pub fn from_record(record: &MessageWithRelations) -> Self {
        Self {
            id: record.message.id,
            user: ChatUserInfo::from_profile(&record.sender),
            content: record.message.content.clone(),
            mentioned_video: record.mentioned_video.as_ref().map(ChatVideoInfo::from_video),
            reply_to: record.reply_to.as_ref().map(|reply| Box::new(Self::from_reply(reply))),
            created_at: record.message.created_at,
        }
    }

    /// Replies render one level deep; a reply's own reply and mention are
    /// not expanded.
    fn from_reply(reply: &ReplySnapshot) -> Self {
        Self {
            id: reply.message.id,
            user: ChatUserInfo::from_profile(&reply.sender),
            content: reply.message.content.clone(),
            mentioned_video: None,
            reply_to: None,
            created_at: reply.message.created_at,
        }
    }
}

/// Extract a video code from its title, e.g. "RLH-001 Opening Night" -> "RLH-001"
pub fn extract_video_code(title: &str) -> &str {
    title.split_whitespace().next().unwrap_or_default()
}
