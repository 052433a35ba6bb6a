//! WebSocket endpoints for the gateway

pub mod client;
pub mod frame;
pub mod health;
pub mod hub;

use axum::{
    extract::{Query, State, WebSocketUpgrade},
    response::Response,
    routing::get,
    Router,
};
use serde::Deserialize;

use crate::error::{GatewayError, GatewayResult};
use crate::state::GatewayState;

/// Inbound frames larger than this are a protocol violation and close the
/// connection.
const MAX_FRAME_BYTES: usize = 16 * 1024;

/// Create all WebSocket routes
pub fn create_websocket_routes() -> Router<GatewayState> {
    Router::new().route("/ws/chat", get(chat_websocket_handler))
}

#[derive(Debug, Deserialize)]
pub struct WebSocketQuery {
    token: Option<String>,
}

/// Chat WebSocket connection handler. Authentication happens before the
/// upgrade completes; a bad token never reaches the hub.
pub async fn chat_websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<GatewayState>,
    Query(query): Query<WebSocketQuery>,
) -> GatewayResult<Response> {
    let token = query.token.ok_or_else(|| {
        GatewayError::AuthenticationFailed("Missing authentication token".to_string())
    })?;

    let session = state
        .session_service
        .validate_session(&token)
        .await
        .map_err(|e| GatewayError::AuthenticationFailed(format!("Invalid token: {e}")))?;

    let profile = state
        .profile_service
        .get_profile(session.user_id)
        .await
        .map_err(|e| GatewayError::AuthenticationFailed(format!("Unknown user: {e}")))?;

    Ok(ws
        .max_message_size(MAX_FRAME_BYTES)
        .on_upgrade(move |socket| client::handle_socket(socket, state, profile)))
}
