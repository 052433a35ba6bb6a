//! Repository for chat ban data access operations.

use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use tracing::info;
use uuid::Uuid;

use crate::entities::{ChatBan, NewChatBan};
use crate::repos::{datetime_col, fmt_ts, opt_datetime_col, opt_uuid_col, uuid_col};
use crate::types::DatabaseResult;

/// Repository for chat ban database operations
#[derive(Clone)]
pub struct BanRepository {
    pool: SqlitePool,
}

impl BanRepository {
    /// Create a new ban repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a ban. Banning an already-banned user replaces the existing
    /// row (user_id is unique).
    pub async fn create(&self, new: &NewChatBan) -> DatabaseResult<ChatBan> {
        let id = Uuid::new_v4();
        let created_at = Utc::now();

        sqlx::query(
            "INSERT INTO chat_bans (id, user_id, reason, banned_by, expires_at, created_at)
             VALUES (?, ?, ?, ?, ?, ?)
             ON CONFLICT(user_id) DO UPDATE SET
                 reason = excluded.reason,
                 banned_by = excluded.banned_by,
                 expires_at = excluded.expires_at,
                 created_at = excluded.created_at",
        )
        .bind(id.to_string())
        .bind(new.user_id.to_string())
        .bind(&new.reason)
        .bind(new.banned_by.map(|v| v.to_string()))
        .bind(new.expires_at.map(fmt_ts))
        .bind(fmt_ts(created_at))
        .execute(&self.pool)
        .await?;

        info!(user_id = %new.user_id, expires_at = ?new.expires_at, "created chat ban");

        Ok(ChatBan {
            id,
            user_id: new.user_id,
            reason: new.reason.clone(),
            banned_by: new.banned_by,
            expires_at: new.expires_at,
            created_at,
        })
    }

    /// Remove a user's ban. Returns false when the user was not banned.
    pub async fn delete(&self, user_id: Uuid) -> DatabaseResult<bool> {
        let result = sqlx::query("DELETE FROM chat_bans WHERE user_id = ?")
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() > 0 {
            info!(user_id = %user_id, "deleted chat ban");
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Point-in-time ban check: a ban counts only while unexpired. Expired
    /// rows stay in place and are simply ignored here.
    pub async fn is_banned(&self, user_id: Uuid, now: DateTime<Utc>) -> DatabaseResult<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM chat_bans
             WHERE user_id = ? AND (expires_at IS NULL OR expires_at > ?)",
        )
        .bind(user_id.to_string())
        .bind(fmt_ts(now))
        .fetch_one(&self.pool)
        .await?;

        Ok(count > 0)
    }

    /// Fetch a user's ban row regardless of expiry.
    pub async fn find_by_user(&self, user_id: Uuid) -> DatabaseResult<Option<ChatBan>> {
        let row = sqlx::query(
            "SELECT id, user_id, reason, banned_by, expires_at, created_at
             FROM chat_bans WHERE user_id = ?",
        )
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| map_ban_row(&row)).transpose()
    }
}

fn map_ban_row(row: &SqliteRow) -> DatabaseResult<ChatBan> {
    Ok(ChatBan {
        id: uuid_col(row, "id")?,
        user_id: uuid_col(row, "user_id")?,
        reason: row.try_get("reason")?,
        banned_by: opt_uuid_col(row, "banned_by")?,
        expires_at: opt_datetime_col(row, "expires_at")?,
        created_at: datetime_col(row, "created_at")?,
    })
}
