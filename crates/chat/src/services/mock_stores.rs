//! In-memory store implementations for exercising the services in tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use reelhub_database::{
    ChatBan, ChatMessage, MessageWithRelations, NewChatBan, NewChatMessage, ReplySnapshot,
    UserProfile, Video,
};

use crate::stores::{BanStore, MessageStore, VideoLookup};
use crate::types::errors::{ChatError, ChatResult};

/// Mock message store backed by a Vec in insertion (= chronological) order.
#[derive(Clone)]
pub struct MockMessageStore {
    messages: Arc<RwLock<Vec<MessageWithRelations>>>,
    users: Arc<RwLock<HashMap<Uuid, UserProfile>>>,
    videos: Arc<RwLock<HashMap<Uuid, Video>>>,
}

impl MockMessageStore {
    pub fn new(users: Vec<UserProfile>) -> Self {
        Self {
            messages: Arc::new(RwLock::new(Vec::new())),
            users: Arc::new(RwLock::new(
                users.into_iter().map(|u| (u.id, u)).collect(),
            )),
            videos: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn register_video(&self, video: Video) {
        self.videos
            .try_write()
            .expect("video registration races a running test")
            .insert(video.id, video);
    }

    pub async fn len(&self) -> usize {
        self.messages.read().await.len()
    }

    pub async fn is_deleted(&self, id: Uuid) -> bool {
        self.messages
            .read()
            .await
            .iter()
            .any(|m| m.message.id == id && m.message.is_deleted)
    }
}

impl MessageStore for MockMessageStore {
    async fn create(&self, new: &NewChatMessage) -> ChatResult<MessageWithRelations> {
        let sender = self
            .users
            .read()
            .await
            .get(&new.user_id)
            .cloned()
            .ok_or_else(|| ChatError::Storage("unknown sender".to_string()))?;

        let reply_to = match new.reply_to_id {
            Some(reply_id) => {
                let messages = self.messages.read().await;
                let target = messages
                    .iter()
                    .find(|m| m.message.id == reply_id)
                    .ok_or_else(|| ChatError::Storage("unknown reply target".to_string()))?;
                Some(ReplySnapshot {
                    message: target.message.clone(),
                    sender: target.sender.clone(),
                })
            }
            None => None,
        };

        let mentioned_video = match new.mentioned_video_id {
            Some(video_id) => self.videos.read().await.get(&video_id).cloned(),
            None => None,
        };

        let record = MessageWithRelations {
            message: ChatMessage {
                id: Uuid::new_v4(),
                user_id: new.user_id,
                content: new.content.clone(),
                reply_to_id: new.reply_to_id,
                mentioned_video_id: new.mentioned_video_id,
                is_deleted: false,
                created_at: Utc::now(),
            },
            sender,
            mentioned_video,
            reply_to,
        };

        self.messages.write().await.push(record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, id: Uuid) -> ChatResult<Option<MessageWithRelations>> {
        Ok(self
            .messages
            .read()
            .await
            .iter()
            .find(|m| m.message.id == id && !m.message.is_deleted)
            .cloned())
    }

    async fn list(
        &self,
        limit: u32,
        before: Option<Uuid>,
    ) -> ChatResult<Vec<MessageWithRelations>> {
        let messages = self.messages.read().await;

        let window: Vec<&MessageWithRelations> = match before {
            Some(before_id) => {
                let cutoff = messages
                    .iter()
                    .position(|m| m.message.id == before_id)
                    .unwrap_or(messages.len());
                messages[..cutoff].iter().collect()
            }
            None => messages.iter().collect(),
        };

        let non_deleted: Vec<&MessageWithRelations> =
            window.into_iter().filter(|m| !m.message.is_deleted).collect();

        let start = non_deleted.len().saturating_sub(limit as usize);
        Ok(non_deleted[start..].iter().map(|m| (*m).clone()).collect())
    }

    async fn soft_delete(&self, id: Uuid) -> ChatResult<bool> {
        let mut messages = self.messages.write().await;
        match messages.iter_mut().find(|m| m.message.id == id) {
            Some(record) => {
                record.message.is_deleted = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// Mock ban store with an optional injected failure for fail-closed tests.
#[derive(Clone)]
pub struct MockBanStore {
    bans: Arc<RwLock<HashMap<Uuid, Option<DateTime<Utc>>>>>,
    fail_next: Arc<AtomicBool>,
}

impl MockBanStore {
    pub fn new() -> Self {
        Self {
            bans: Arc::new(RwLock::new(HashMap::new())),
            fail_next: Arc::new(AtomicBool::new(false)),
        }
    }

    pub async fn ban(&self, user_id: Uuid) {
        self.bans.write().await.insert(user_id, None);
    }

    pub fn fail_next_check(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }
}

impl BanStore for MockBanStore {
    async fn create(&self, new: &NewChatBan) -> ChatResult<ChatBan> {
        self.bans.write().await.insert(new.user_id, new.expires_at);
        Ok(ChatBan {
            id: Uuid::new_v4(),
            user_id: new.user_id,
            reason: new.reason.clone(),
            banned_by: new.banned_by,
            expires_at: new.expires_at,
            created_at: Utc::now(),
        })
    }

    async fn delete(&self, user_id: Uuid) -> ChatResult<bool> {
        Ok(self.bans.write().await.remove(&user_id).is_some())
    }

    async fn is_banned(&self, user_id: Uuid) -> ChatResult<bool> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(ChatError::Storage("ban store unavailable".to_string()));
        }

        let now = Utc::now();
        Ok(match self.bans.read().await.get(&user_id) {
            Some(None) => true,
            Some(Some(expires_at)) => *expires_at > now,
            None => false,
        })
    }
}

/// Mock video catalog lookup.
#[derive(Clone)]
pub struct MockVideoLookup {
    videos: Arc<HashMap<Uuid, Video>>,
}

impl MockVideoLookup {
    pub fn new(videos: Vec<Video>) -> Self {
        Self {
            videos: Arc::new(videos.into_iter().map(|v| (v.id, v)).collect()),
        }
    }

    pub fn videos(&self) -> Vec<Video> {
        self.videos.values().cloned().collect()
    }
}

impl VideoLookup for MockVideoLookup {
    async fn find_by_id(&self, id: Uuid) -> ChatResult<Option<Video>> {
        Ok(self.videos.get(&id).cloned())
    }
}
