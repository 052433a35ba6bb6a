//! Repository for auth session lookups.
//!
//! Sessions are minted by the surrounding application's auth flow; the chat
//! backend only validates tokens.

use sqlx::{Row, SqlitePool};

use crate::entities::session::AuthSession;
use crate::repos::{datetime_col, fmt_ts, opt_datetime_col, uuid_col};
use crate::types::DatabaseResult;

/// Repository for auth session database operations
#[derive(Clone)]
pub struct SessionRepository {
    pool: SqlitePool,
}

impl SessionRepository {
    /// Create a new session repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Look up a session by its bearer token.
    pub async fn find_by_token(&self, token: &str) -> DatabaseResult<Option<AuthSession>> {
        let row = sqlx::query(
            "SELECT token, user_id, expires_at, created_at FROM auth_sessions WHERE token = ?",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| {
            Ok(AuthSession {
                token: row.try_get("token")?,
                user_id: uuid_col(&row, "user_id")?,
                expires_at: opt_datetime_col(&row, "expires_at")?,
                created_at: datetime_col(&row, "created_at")?,
            })
        })
        .transpose()
    }

    /// Insert a session row (seeding and tests).
    pub async fn create(&self, session: &AuthSession) -> DatabaseResult<()> {
        sqlx::query(
            "INSERT INTO auth_sessions (token, user_id, expires_at, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&session.token)
        .bind(session.user_id.to_string())
        .bind(session.expires_at.map(fmt_ts))
        .bind(fmt_ts(session.created_at))
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
