//! Middleware for authentication and other cross-cutting concerns

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::error::GatewayError;
use crate::state::GatewayState;

/// Authenticated requester, attached to request extensions by
/// `auth_middleware`.
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser {
    pub id: Uuid,
    pub is_admin: bool,
}

/// Authentication middleware that validates bearer session tokens and
/// resolves the requester's profile.
pub async fn auth_middleware(
    State(state): State<GatewayState>,
    mut request: Request,
    next: Next,
) -> Result<Response, GatewayError> {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "))
        .ok_or_else(|| {
            GatewayError::AuthenticationFailed("Missing authentication token".to_string())
        })?;

    let session = state
        .session_service
        .validate_session(token)
        .await
        .map_err(|e| GatewayError::AuthenticationFailed(format!("Invalid token: {e}")))?;

    let profile = state
        .profile_service
        .get_profile(session.user_id)
        .await
        .map_err(|e| GatewayError::AuthenticationFailed(format!("Unknown user: {e}")))?;

    request.extensions_mut().insert(CurrentUser {
        id: profile.id,
        is_admin: profile.is_admin(),
    });

    Ok(next.run(request).await)
}
