//! Chat message service: sending with enrichment, and history reads.

use tracing::warn;
use uuid::Uuid;

use reelhub_database::NewChatMessage;

use crate::stores::{BanStore, MessageStore, VideoLookup};
use crate::types::errors::{ChatError, ChatResult};
use crate::types::responses::ChatMessageView;
use crate::utils::validation::validate_message_content;

/// Limits applied to history reads, matching the REST surface.
const DEFAULT_HISTORY_LIMIT: u32 = 50;
const MAX_HISTORY_LIMIT: u32 = 100;

/// Request to send a chat message.
#[derive(Debug, Clone, Default)]
pub struct SendMessageRequest {
    pub content: String,
    /// Message being replied to; must exist at send time.
    pub reply_to: Option<Uuid>,
    /// Video mention; unknown ids are dropped silently.
    pub video_id: Option<Uuid>,
}

/// Service for sending and reading chat messages
pub struct ChatService<M, B, V> {
    messages: M,
    bans: B,
    videos: V,
}

impl<M, B, V> ChatService<M, B, V>
where
    M: MessageStore,
    B: BanStore,
    V: VideoLookup,
{
    pub fn new(messages: M, bans: B, videos: V) -> Self {
        Self {
            messages,
            bans,
            videos,
        }
    }

    /// Validate, moderate, persist, and return the broadcast view of a
    /// message. Banned senders (and senders whose ban status cannot be
    /// determined) get `ChatError::Banned`; nothing is persisted for them.
    pub async fn send_message(
        &self,
        sender_id: Uuid,
        request: &SendMessageRequest,
    ) -> ChatResult<ChatMessageView> {
        validate_message_content(&request.content)?;

        // Fail closed: if the ban store is unreachable, treat as banned.
        let banned = match self.bans.is_banned(sender_id).await {
            Ok(banned) => banned,
            Err(error) => {
                warn!(user_id = %sender_id, %error, "ban check failed, rejecting message");
                true
            }
        };
        if banned {
            return Err(ChatError::Banned);
        }

        let reply_to_id = match request.reply_to {
            Some(reply_id) => match self.messages.find_by_id(reply_id).await? {
                Some(reply) => Some(reply.message.id),
                None => {
                    return Err(ChatError::Validation(
                        "replied-to message not found".to_string(),
                    ))
                }
            },
            None => None,
        };

        // A mention is enrichment only; ids that resolve to nothing are dropped.
        let mentioned_video_id = match request.video_id {
            Some(video_id) => self.videos.find_by_id(video_id).await?.map(|video| video.id),
            None => None,
        };

        let record = self
            .messages
            .create(&NewChatMessage {
                user_id: sender_id,
                content: request.content.clone(),
                reply_to_id,
                mentioned_video_id,
            })
            .await?;

        Ok(ChatMessageView::from_record(&record))
    }

    /// Read recent messages oldest-first. The limit is clamped to
    /// 1..=100, defaulting to 50.
    pub async fn get_messages(
        &self,
        limit: Option<u32>,
        before: Option<Uuid>,
    ) -> ChatResult<Vec<ChatMessageView>> {
        let limit = match limit {
            Some(limit) if (1..=MAX_HISTORY_LIMIT).contains(&limit) => limit,
            _ => DEFAULT_HISTORY_LIMIT,
        };

        let records = self.messages.list(limit, before).await?;
        Ok(records.iter().map(ChatMessageView::from_record).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::mock_stores::{MockBanStore, MockMessageStore, MockVideoLookup};
    use reelhub_database::{UserProfile, UserRole, Video};

    fn profile(username: &str, level: i64) -> UserProfile {
        UserProfile {
            id: Uuid::new_v4(),
            username: username.to_string(),
            display_name: format!("{username} display"),
            avatar_url: None,
            level,
            role: UserRole::User,
        }
    }

    fn service_with(
        users: Vec<UserProfile>,
        videos: Vec<Video>,
    ) -> (
        ChatService<MockMessageStore, MockBanStore, MockVideoLookup>,
        MockMessageStore,
        MockBanStore,
    ) {
        let messages = MockMessageStore::new(users);
        let bans = MockBanStore::new();
        let lookup = MockVideoLookup::new(videos);
        for video in lookup.videos() {
            messages.register_video(video);
        }
        (
            ChatService::new(messages.clone(), bans.clone(), lookup),
            messages,
            bans,
        )
    }

    #[tokio::test]
    async fn send_message_persists_and_returns_view() {
        let alice = profile("alice", 26);
        let (service, messages, _bans) = service_with(vec![alice.clone()], vec![]);

        let view = service
            .send_message(
                alice.id,
                &SendMessageRequest {
                    content: "hello".to_string(),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(view.content, "hello");
        assert_eq!(view.user.username, "alice");
        assert_eq!(view.user.level_badge, "🥈");
        assert_eq!(messages.len().await, 1);
    }

    #[tokio::test]
    async fn banned_sender_is_rejected_before_persistence() {
        let alice = profile("alice", 1);
        let (service, messages, bans) = service_with(vec![alice.clone()], vec![]);
        bans.ban(alice.id).await;

        let result = service
            .send_message(
                alice.id,
                &SendMessageRequest {
                    content: "should not appear".to_string(),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(ChatError::Banned)));
        assert_eq!(messages.len().await, 0);
    }

    #[tokio::test]
    async fn ban_check_failure_fails_closed() {
        let alice = profile("alice", 1);
        let (service, messages, bans) = service_with(vec![alice.clone()], vec![]);
        bans.fail_next_check();

        let result = service
            .send_message(
                alice.id,
                &SendMessageRequest {
                    content: "hi".to_string(),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(ChatError::Banned)));
        assert_eq!(messages.len().await, 0);
    }

    #[tokio::test]
    async fn invalid_content_is_rejected() {
        let alice = profile("alice", 1);
        let (service, messages, _bans) = service_with(vec![alice.clone()], vec![]);

        let empty = service
            .send_message(alice.id, &SendMessageRequest::default())
            .await;
        assert!(matches!(empty, Err(ChatError::Validation(_))));

        let oversize = service
            .send_message(
                alice.id,
                &SendMessageRequest {
                    content: "x".repeat(1001),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(oversize, Err(ChatError::Validation(_))));
        assert_eq!(messages.len().await, 0);
    }

    #[tokio::test]
    async fn reply_must_reference_existing_message() {
        let alice = profile("alice", 1);
        let (service, _messages, _bans) = service_with(vec![alice.clone()], vec![]);

        let result = service
            .send_message(
                alice.id,
                &SendMessageRequest {
                    content: "replying".to_string(),
                    reply_to: Some(Uuid::new_v4()),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(ChatError::Validation(_))));
    }

    #[tokio::test]
    async fn reply_view_snapshots_content_at_send_time() {
        let alice = profile("alice", 1);
        let bob = profile("bob", 1);
        let (service, messages, _bans) = service_with(vec![alice.clone(), bob.clone()], vec![]);

        let original = service
            .send_message(
                alice.id,
                &SendMessageRequest {
                    content: "original words".to_string(),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let reply = service
            .send_message(
                bob.id,
                &SendMessageRequest {
                    content: "agreed".to_string(),
                    reply_to: Some(original.id),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let snapshot = reply.reply_to.unwrap();
        assert_eq!(snapshot.id, original.id);
        assert_eq!(snapshot.content, "original words");
        assert_eq!(snapshot.user.username, "alice");

        // Soft-deleting the original afterwards does not rewrite the
        // snapshot that was broadcast.
        messages.soft_delete(original.id).await.unwrap();
        assert_eq!(snapshot.content, "original words");
    }

    #[tokio::test]
    async fn unknown_video_mention_is_dropped_silently() {
        let alice = profile("alice", 1);
        let video = Video {
            id: Uuid::new_v4(),
            title: "RLH-002 Encore".to_string(),
            thumbnail: None,
        };
        let (service, _messages, _bans) = service_with(vec![alice.clone()], vec![video.clone()]);

        let with_known = service
            .send_message(
                alice.id,
                &SendMessageRequest {
                    content: "watch this".to_string(),
                    video_id: Some(video.id),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let mention = with_known.mentioned_video.unwrap();
        assert_eq!(mention.code, "RLH-002");

        let with_unknown = service
            .send_message(
                alice.id,
                &SendMessageRequest {
                    content: "watch that".to_string(),
                    video_id: Some(Uuid::new_v4()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(with_unknown.mentioned_video.is_none());
    }

    #[tokio::test]
    async fn history_limit_is_clamped() {
        let alice = profile("alice", 1);
        let (service, _messages, _bans) = service_with(vec![alice.clone()], vec![]);

        for i in 0..60 {
            service
                .send_message(
                    alice.id,
                    &SendMessageRequest {
                        content: format!("message {i}"),
                        ..Default::default()
                    },
                )
                .await
                .unwrap();
        }

        // Out-of-range limits fall back to the default of 50
        assert_eq!(service.get_messages(Some(0), None).await.unwrap().len(), 50);
        assert_eq!(service.get_messages(Some(500), None).await.unwrap().len(), 50);
        assert_eq!(service.get_messages(None, None).await.unwrap().len(), 50);
        assert_eq!(service.get_messages(Some(10), None).await.unwrap().len(), 10);

        let history = service.get_messages(Some(10), None).await.unwrap();
        assert_eq!(history.first().unwrap().content, "message 50");
        assert_eq!(history.last().unwrap().content, "message 59");
    }
}
