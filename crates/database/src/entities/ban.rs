//! Chat ban entity definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A chat ban. `expires_at = None` means permanent. Expired rows stay in
/// place; "banned" is always a point-in-time query, never a cached flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatBan {
    pub id: Uuid,
    pub user_id: Uuid,
    pub reason: String,
    pub banned_by: Option<Uuid>,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl ChatBan {
    /// Whether the ban is in force at the given instant.
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            None => true,
            Some(expires_at) => expires_at > now,
        }
    }
}

/// Insert payload for a new ban.
#[derive(Debug, Clone)]
pub struct NewChatBan {
    pub user_id: Uuid,
    pub reason: String,
    pub banned_by: Option<Uuid>,
    pub expires_at: Option<DateTime<Utc>>,
}
