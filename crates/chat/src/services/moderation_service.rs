//! Moderation service: bans and message deletion.

use chrono::{Duration, Utc};
use tracing::info;
use uuid::Uuid;

use reelhub_database::{ChatBan, NewChatBan};

use crate::stores::{BanStore, MessageStore};
use crate::types::errors::{ChatError, ChatResult};

/// Service for chat moderation operations
pub struct ModerationService<B, M> {
    bans: B,
    messages: M,
}

impl<B, M> ModerationService<B, M>
where
    B: BanStore,
    M: MessageStore,
{
    pub fn new(bans: B, messages: M) -> Self {
        Self { bans, messages }
    }

    /// Ban a user from chat. `duration_hours = None` means permanent.
    pub async fn ban_user(
        &self,
        user_id: Uuid,
        reason: String,
        banned_by: Uuid,
        duration_hours: Option<i64>,
    ) -> ChatResult<ChatBan> {
        let expires_at = duration_hours
            .filter(|hours| *hours > 0)
            .map(|hours| Utc::now() + Duration::hours(hours));

        let ban = self
            .bans
            .create(&NewChatBan {
                user_id,
                reason,
                banned_by: Some(banned_by),
                expires_at,
            })
            .await?;

        info!(user_id = %user_id, banned_by = %banned_by, expires_at = ?ban.expires_at, "user banned from chat");
        Ok(ban)
    }

    /// Lift a user's ban.
    pub async fn unban_user(&self, user_id: Uuid) -> ChatResult<()> {
        self.bans.delete(user_id).await?;
        info!(user_id = %user_id, "user unbanned from chat");
        Ok(())
    }

    /// Expiry-aware ban check.
    pub async fn is_banned(&self, user_id: Uuid) -> ChatResult<bool> {
        self.bans.is_banned(user_id).await
    }

    /// Soft-delete a message. Only the message owner or an admin may
    /// delete; everyone else gets an authorization error and the message
    /// is left untouched.
    pub async fn delete_message(
        &self,
        message_id: Uuid,
        requester_id: Uuid,
        is_admin: bool,
    ) -> ChatResult<()> {
        let record = self
            .messages
            .find_by_id(message_id)
            .await?
            .ok_or(ChatError::MessageNotFound)?;

        if !is_admin && record.message.user_id != requester_id {
            return Err(ChatError::NotMessageOwner);
        }

        if !self.messages.soft_delete(message_id).await? {
            return Err(ChatError::MessageNotFound);
        }

        info!(message_id = %message_id, deleted_by = %requester_id, "chat message deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::mock_stores::{MockBanStore, MockMessageStore};
    use reelhub_database::{NewChatMessage, UserProfile, UserRole};

    fn profile(username: &str) -> UserProfile {
        UserProfile {
            id: Uuid::new_v4(),
            username: username.to_string(),
            display_name: username.to_string(),
            avatar_url: None,
            level: 1,
            role: UserRole::User,
        }
    }

    async fn seed_message(messages: &MockMessageStore, user_id: Uuid, content: &str) -> Uuid {
        use crate::stores::MessageStore as _;
        messages
            .create(&NewChatMessage {
                user_id,
                content: content.to_string(),
                reply_to_id: None,
                mentioned_video_id: None,
            })
            .await
            .unwrap()
            .message
            .id
    }

    #[tokio::test]
    async fn timed_ban_gets_an_expiry_and_permanent_does_not() {
        let bans = MockBanStore::new();
        let messages = MockMessageStore::new(vec![]);
        let service = ModerationService::new(bans.clone(), messages);
        let target = Uuid::new_v4();
        let admin = Uuid::new_v4();

        let timed = service
            .ban_user(target, "spam".to_string(), admin, Some(24))
            .await
            .unwrap();
        assert!(timed.expires_at.is_some());
        assert!(service.is_banned(target).await.unwrap());

        let permanent = service
            .ban_user(target, "again".to_string(), admin, None)
            .await
            .unwrap();
        assert!(permanent.expires_at.is_none());

        service.unban_user(target).await.unwrap();
        assert!(!service.is_banned(target).await.unwrap());
    }

    #[tokio::test]
    async fn owner_can_delete_own_message() {
        let owner = profile("owner");
        let messages = MockMessageStore::new(vec![owner.clone()]);
        let service = ModerationService::new(MockBanStore::new(), messages.clone());
        let message_id = seed_message(&messages, owner.id, "mine").await;

        service.delete_message(message_id, owner.id, false).await.unwrap();
        assert!(messages.is_deleted(message_id).await);
    }

    #[tokio::test]
    async fn non_owner_non_admin_cannot_delete() {
        let owner = profile("owner");
        let other = profile("other");
        let messages = MockMessageStore::new(vec![owner.clone(), other.clone()]);
        let service = ModerationService::new(MockBanStore::new(), messages.clone());
        let message_id = seed_message(&messages, owner.id, "mine").await;

        let result = service.delete_message(message_id, other.id, false).await;
        assert!(matches!(result, Err(ChatError::NotMessageOwner)));
        assert!(!messages.is_deleted(message_id).await);
    }

    #[tokio::test]
    async fn admin_can_delete_any_message() {
        let owner = profile("owner");
        let admin = profile("admin");
        let messages = MockMessageStore::new(vec![owner.clone(), admin.clone()]);
        let service = ModerationService::new(MockBanStore::new(), messages.clone());
        let message_id = seed_message(&messages, owner.id, "mine").await;

        service.delete_message(message_id, admin.id, true).await.unwrap();
        assert!(messages.is_deleted(message_id).await);
    }

    #[tokio::test]
    async fn deleting_unknown_message_reports_not_found() {
        let messages = MockMessageStore::new(vec![]);
        let service = ModerationService::new(MockBanStore::new(), messages);

        let result = service
            .delete_message(Uuid::new_v4(), Uuid::new_v4(), true)
            .await;
        assert!(matches!(result, Err(ChatError::MessageNotFound)));
    }
}
