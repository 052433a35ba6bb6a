//! Repository for chat message data access operations.

use chrono::Utc;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use tracing::info;
use uuid::Uuid;

use crate::entities::{ChatMessage, MessageWithRelations, NewChatMessage, ReplySnapshot};
use crate::entities::user::{UserProfile, UserRole};
use crate::entities::video::Video;
use crate::repos::{datetime_col, fmt_ts, opt_uuid_col, uuid_col};
use crate::types::{DatabaseError, DatabaseResult};

/// Hydrating select: every message carries its sender profile, the mentioned
/// video if any, and the replied-to message (one level deep) with its sender.
const HYDRATED_SELECT: &str = r#"
SELECT
    m.id AS m_id, m.user_id AS m_user_id, m.content AS m_content,
    m.reply_to_id AS m_reply_to_id, m.mentioned_video_id AS m_video_id,
    m.is_deleted AS m_is_deleted, m.created_at AS m_created_at,
    u.username AS u_username, u.display_name AS u_display_name,
    u.avatar_url AS u_avatar_url, u.level AS u_level, u.role AS u_role,
    v.id AS v_id, v.title AS v_title, v.thumbnail AS v_thumbnail,
    r.id AS r_id, r.user_id AS r_user_id, r.content AS r_content,
    r.reply_to_id AS r_reply_to_id, r.mentioned_video_id AS r_video_id,
    r.is_deleted AS r_is_deleted, r.created_at AS r_created_at,
    ru.username AS ru_username, ru.display_name AS ru_display_name,
    ru.avatar_url AS ru_avatar_url, ru.level AS ru_level, ru.role AS ru_role
FROM chat_messages m
JOIN users u ON u.id = m.user_id
LEFT JOIN videos v ON v.id = m.mentioned_video_id
LEFT JOIN chat_messages r ON r.id = m.reply_to_id
LEFT JOIN users ru ON ru.id = r.user_id
"#;

/// Repository for chat message database operations
#[derive(Clone)]
pub struct MessageRepository {
    pool: SqlitePool,
}

impl MessageRepository {
    /// Create a new message repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new message and return it hydrated with its relations.
    pub async fn create(&self, new: &NewChatMessage) -> DatabaseResult<MessageWithRelations> {
        let id = Uuid::new_v4();
        let now = fmt_ts(Utc::now());

        sqlx::query(
            "INSERT INTO chat_messages (id, user_id, content, reply_to_id, mentioned_video_id, is_deleted, created_at)
             VALUES (?, ?, ?, ?, ?, 0, ?)",
        )
        .bind(id.to_string())
        .bind(new.user_id.to_string())
        .bind(&new.content)
        .bind(new.reply_to_id.map(|v| v.to_string()))
        .bind(new.mentioned_video_id.map(|v| v.to_string()))
        .bind(&now)
        .execute(&self.pool)
        .await?;

        info!(message_id = %id, user_id = %new.user_id, "created chat message");

        self.find_by_id(id)
            .await?
            .ok_or_else(|| DatabaseError::Query("inserted message not found".to_string()))
    }

    /// Find a non-deleted message by id, hydrated with its relations.
    pub async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<MessageWithRelations>> {
        let sql = format!("{HYDRATED_SELECT} WHERE m.id = ? AND m.is_deleted = 0");
        let row = sqlx::query(&sql)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(|row| map_hydrated_row(&row)).transpose()
    }

    /// List the most recent non-deleted messages in ascending chronological
    /// order. With `before`, only messages older than that message are
    /// returned (cursor pagination).
    pub async fn list(
        &self,
        limit: u32,
        before: Option<Uuid>,
    ) -> DatabaseResult<Vec<MessageWithRelations>> {
        let rows = match before {
            Some(before_id) => {
                let sql = format!(
                    "{HYDRATED_SELECT}
                     WHERE m.is_deleted = 0
                       AND m.created_at < (SELECT created_at FROM chat_messages WHERE id = ?)
                     ORDER BY m.created_at DESC, m.rowid DESC LIMIT ?"
                );
                sqlx::query(&sql)
                    .bind(before_id.to_string())
                    .bind(i64::from(limit))
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let sql = format!(
                    "{HYDRATED_SELECT} WHERE m.is_deleted = 0 ORDER BY m.created_at DESC, m.rowid DESC LIMIT ?"
                );
                sqlx::query(&sql)
                    .bind(i64::from(limit))
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        let mut messages = rows
            .iter()
            .map(map_hydrated_row)
            .collect::<DatabaseResult<Vec<_>>>()?;

        // The window is selected newest-first; callers want chronological order.
        messages.reverse();
        Ok(messages)
    }

    /// Soft-delete a message. Returns false when no row matched.
    pub async fn soft_delete(&self, id: Uuid) -> DatabaseResult<bool> {
        let result = sqlx::query("UPDATE chat_messages SET is_deleted = 1 WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() > 0 {
            info!(message_id = %id, "soft-deleted chat message");
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

fn map_hydrated_row(row: &SqliteRow) -> DatabaseResult<MessageWithRelations> {
    let message = ChatMessage {
        id: uuid_col(row, "m_id")?,
        user_id: uuid_col(row, "m_user_id")?,
        content: row.try_get("m_content")?,
        reply_to_id: opt_uuid_col(row, "m_reply_to_id")?,
        mentioned_video_id: opt_uuid_col(row, "m_video_id")?,
        is_deleted: row.try_get::<i64, _>("m_is_deleted")? != 0,
        created_at: datetime_col(row, "m_created_at")?,
    };

    let sender = UserProfile {
        id: message.user_id,
        username: row.try_get("u_username")?,
        display_name: row.try_get("u_display_name")?,
        avatar_url: row.try_get("u_avatar_url")?,
        level: row.try_get("u_level")?,
        role: UserRole::from(row.try_get::<String, _>("u_role")?.as_str()),
    };

    let mentioned_video = match opt_uuid_col(row, "v_id")? {
        Some(video_id) => Some(Video {
            id: video_id,
            title: row.try_get("v_title")?,
            thumbnail: row.try_get("v_thumbnail")?,
        }),
        None => None,
    };

    let reply_to = match opt_uuid_col(row, "r_id")? {
        Some(reply_id) => {
            let reply_message = ChatMessage {
                id: reply_id,
                user_id: uuid_col(row, "r_user_id")?,
                content: row.try_get("r_content")?,
                reply_to_id: opt_uuid_col(row, "r_reply_to_id")?,
                mentioned_video_id: opt_uuid_col(row, "r_video_id")?,
                is_deleted: row.try_get::<i64, _>("r_is_deleted")? != 0,
                created_at: datetime_col(row, "r_created_at")?,
            };
            let reply_sender = UserProfile {
                id: reply_message.user_id,
                username: row.try_get("ru_username")?,
                display_name: row.try_get("ru_display_name")?,
                avatar_url: row.try_get("ru_avatar_url")?,
                level: row.try_get("ru_level")?,
                role: UserRole::from(row.try_get::<String, _>("ru_role")?.as_str()),
            };
            Some(ReplySnapshot {
                message: reply_message,
                sender: reply_sender,
            })
        }
        None => None,
    };

    Ok(MessageWithRelations {
        message,
        sender,
        mentioned_video,
        reply_to,
    })
}
