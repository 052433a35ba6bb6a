//! Shared application state for the gateway

use std::sync::Arc;

use sqlx::SqlitePool;

use reelhub_chat::{ChatService, ModerationService};
use reelhub_config::ChatConfig;
use reelhub_database::{
    BanRepository, MessageRepository, SessionRepository, UserRepository, VideoRepository,
};
use reelhub_users::{ProfileService, SessionService};

use crate::websocket::hub::{ChatHub, HubConfig};

/// Concrete service types wired against the sqlite repositories.
pub type AppChatService = ChatService<MessageRepository, BanRepository, VideoRepository>;
pub type AppModerationService = ModerationService<BanRepository, MessageRepository>;
pub type AppProfileService = ProfileService<UserRepository>;
pub type AppSessionService = SessionService<SessionRepository>;

/// Shared application state containing all services and the chat hub
#[derive(Clone)]
pub struct GatewayState {
    /// Database connection pool
    pub pool: SqlitePool,
    /// Chat hub tuning
    pub chat_config: ChatConfig,
    /// Chat message service
    pub chat_service: Arc<AppChatService>,
    /// Moderation service
    pub moderation_service: Arc<AppModerationService>,
    /// Profile lookup service
    pub profile_service: Arc<AppProfileService>,
    /// Session validation service
    pub session_service: Arc<AppSessionService>,
    /// Connection registry
    pub hub: Arc<ChatHub>,
}

impl GatewayState {
    /// Create a new gateway state with all services initialized
    pub fn new(pool: SqlitePool, chat_config: ChatConfig) -> Self {
        let messages = MessageRepository::new(pool.clone());
        let bans = BanRepository::new(pool.clone());
        let videos = VideoRepository::new(pool.clone());

        let chat_service = Arc::new(ChatService::new(
            messages.clone(),
            bans.clone(),
            videos.clone(),
        ));
        let moderation_service = Arc::new(ModerationService::new(bans, messages));
        let profile_service = Arc::new(ProfileService::new(UserRepository::new(pool.clone())));
        let session_service = Arc::new(SessionService::new(SessionRepository::new(pool.clone())));

        let hub = ChatHub::new(HubConfig::from_chat_config(&chat_config));

        Self {
            pool,
            chat_config,
            chat_service,
            moderation_service,
            profile_service,
            session_service,
            hub,
        }
    }
}
