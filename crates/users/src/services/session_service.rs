//! Session validation service.
//!
//! Sessions are minted by the surrounding application's auth flow; this
//! service only answers "who does this bearer token belong to".

use chrono::Utc;
use tracing::debug;

use reelhub_database::{AuthSession, SessionRepository};

use crate::types::errors::{AuthError, AuthResult};

/// Trait for session lookups to allow generic usage
pub trait SessionStore {
    async fn find_by_token(&self, token: &str) -> AuthResult<Option<AuthSession>>;
}

impl SessionStore for SessionRepository {
    async fn find_by_token(&self, token: &str) -> AuthResult<Option<AuthSession>> {
        self.find_by_token(token).await.map_err(Into::into)
    }
}

/// Service for validating session tokens
pub struct SessionService<R> {
    sessions: R,
}

impl<R> SessionService<R>
where
    R: SessionStore,
{
    pub fn new(sessions: R) -> Self {
        Self { sessions }
    }

    /// Validate a bearer token and return the session it belongs to.
    pub async fn validate_session(&self, token: &str) -> AuthResult<AuthSession> {
        if token.trim().is_empty() {
            return Err(AuthError::InvalidSession);
        }

        let session = self
            .sessions
            .find_by_token(token)
            .await?
            .ok_or(AuthError::InvalidSession)?;

        if !session.is_valid_at(Utc::now()) {
            debug!(user_id = %session.user_id, "rejected expired session");
            return Err(AuthError::SessionExpired);
        }

        Ok(session)
    }
}
