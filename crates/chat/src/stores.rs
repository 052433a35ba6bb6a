//! Store traits the chat services operate over.
//!
//! Messages, bans, and the video catalog live behind these seams so the
//! services (and the gateway's hub) can be exercised against in-memory
//! stores in tests, while production wires in the sqlite repositories.

use chrono::Utc;
use uuid::Uuid;

use reelhub_database::{
    BanRepository, ChatBan, MessageRepository, MessageWithRelations, NewChatBan, NewChatMessage,
    Video, VideoRepository,
};

use crate::types::errors::ChatResult;

/// Durable message persistence. Messages are never hard-deleted here.
pub trait MessageStore {
    async fn create(&self, new: &NewChatMessage) -> ChatResult<MessageWithRelations>;
    async fn find_by_id(&self, id: Uuid) -> ChatResult<Option<MessageWithRelations>>;
    /// Most recent non-deleted messages, ascending by creation time.
    async fn list(&self, limit: u32, before: Option<Uuid>) -> ChatResult<Vec<MessageWithRelations>>;
    /// Returns false when no message matched.
    async fn soft_delete(&self, id: Uuid) -> ChatResult<bool>;
}

/// Durable ban persistence. `is_banned` is expiry-aware.
pub trait BanStore {
    async fn create(&self, new: &NewChatBan) -> ChatResult<ChatBan>;
    async fn delete(&self, user_id: Uuid) -> ChatResult<bool>;
    async fn is_banned(&self, user_id: Uuid) -> ChatResult<bool>;
}

/// Read-only lookup into the video catalog for mention enrichment.
pub trait VideoLookup {
    async fn find_by_id(&self, id: Uuid) -> ChatResult<Option<Video>>;
}

impl MessageStore for MessageRepository {
    async fn create(&self, new: &NewChatMessage) -> ChatResult<MessageWithRelations> {
        self.create(new).await.map_err(Into::into)
    }

    async fn find_by_id(&self, id: Uuid) -> ChatResult<Option<MessageWithRelations>> {
        self.find_by_id(id).await.map_err(Into::into)
    }

    async fn list(
        &self,
        limit: u32,
        before: Option<Uuid>,
    ) -> ChatResult<Vec<MessageWithRelations>> {
        self.list(limit, before).await.map_err(Into::into)
    }

    async fn soft_delete(&self, id: Uuid) -> ChatResult<bool> {
        self.soft_delete(id).await.map_err(Into::into)
    }
}

impl BanStore for BanRepository {
    async fn create(&self, new: &NewChatBan) -> ChatResult<ChatBan> {
        self.create(new).await.map_err(Into::into)
    }

    async fn delete(&self, user_id: Uuid) -> ChatResult<bool> {
        self.delete(user_id).await.map_err(Into::into)
    }

    async fn is_banned(&self, user_id: Uuid) -> ChatResult<bool> {
        self.is_banned(user_id, Utc::now()).await.map_err(Into::into)
    }
}

impl VideoLookup for VideoRepository {
    async fn find_by_id(&self, id: Uuid) -> ChatResult<Option<Video>> {
        self.find_by_id(id).await.map_err(Into::into)
    }
}
