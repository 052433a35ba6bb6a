//! Repository for user data access operations.
//!
//! User records are owned by the surrounding catalog application; the chat
//! backend reads profiles and, for local seeding, inserts demo users.

use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::entities::user::{User, UserProfile, UserRole};
use crate::repos::fmt_ts;
use crate::types::DatabaseResult;

/// Repository for user database operations
#[derive(Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Look up the display profile for a user.
    pub async fn find_profile(&self, user_id: Uuid) -> DatabaseResult<Option<UserProfile>> {
        let row = sqlx::query(
            "SELECT id, username, display_name, avatar_url, level, role
             FROM users WHERE id = ?",
        )
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| {
            Ok(UserProfile {
                id: user_id,
                username: row.try_get("username")?,
                display_name: row.try_get("display_name")?,
                avatar_url: row.try_get("avatar_url")?,
                level: row.try_get("level")?,
                role: UserRole::from(row.try_get::<String, _>("role")?.as_str()),
            })
        })
        .transpose()
    }

    /// Insert a user row (seeding and tests).
    pub async fn create(&self, user: &User) -> DatabaseResult<()> {
        sqlx::query(
            "INSERT INTO users (id, username, display_name, avatar_url, level, role, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(user.id.to_string())
        .bind(&user.username)
        .bind(&user.display_name)
        .bind(&user.avatar_url)
        .bind(user.level)
        .bind(user.role.as_str())
        .bind(fmt_ts(user.created_at))
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
