//! Chat REST endpoints: history reads and presence.

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use reelhub_chat::ChatMessageView;

use crate::error::GatewayResult;
use crate::state::GatewayState;

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListMessagesQuery {
    /// Window size, clamped to 1..=100 (default 50)
    pub limit: Option<u32>,
    /// Return only messages older than this message id
    pub before: Option<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OnlineCountResponse {
    pub count: usize,
}

/// Create chat routes
pub fn create_chat_routes() -> Router<GatewayState> {
    Router::new()
        .route("/chat/messages", get(list_messages))
        .route("/chat/online-count", get(online_count))
}

#[utoipa::path(
    get,
    path = "/api/chat/messages",
    tag = "chat",
    params(ListMessagesQuery),
    responses(
        (status = 200, description = "Recent chat messages, oldest first"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_messages(
    Query(params): Query<ListMessagesQuery>,
    State(state): State<GatewayState>,
) -> GatewayResult<Json<Vec<ChatMessageView>>> {
    let messages = state
        .chat_service
        .get_messages(params.limit, params.before)
        .await?;
    Ok(Json(messages))
}

#[utoipa::path(
    get,
    path = "/api/chat/online-count",
    tag = "chat",
    responses(
        (status = 200, description = "Number of connected chat clients", body = OnlineCountResponse)
    )
)]
pub async fn online_count(
    State(state): State<GatewayState>,
) -> GatewayResult<Json<OnlineCountResponse>> {
    let count = state.hub.online_count().await;
    Ok(Json(OnlineCountResponse { count }))
}
