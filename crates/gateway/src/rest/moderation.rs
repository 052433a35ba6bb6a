//! Moderation REST endpoints: message deletion and bans.

use axum::{
    extract::{Path, State},
    routing::{delete, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{GatewayError, GatewayResult};
use crate::middleware::CurrentUser;
use crate::state::GatewayState;
use crate::websocket::frame::{MessageDeleted, ServerFrame};

#[derive(Debug, Deserialize, ToSchema)]
pub struct BanUserRequest {
    #[serde(rename = "userId")]
    pub user_id: Uuid,
    pub reason: String,
    /// Ban length in hours; absent means permanent
    #[serde(rename = "durationHours")]
    pub duration_hours: Option<i64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ModerationResponse {
    pub message: String,
}

/// Create moderation routes
pub fn create_moderation_routes() -> Router<GatewayState> {
    Router::new()
        .route("/chat/messages/:id", delete(delete_message))
        .route("/chat/bans", post(ban_user))
        .route("/chat/bans/:user_id", delete(unban_user))
}

#[utoipa::path(
    delete,
    path = "/api/chat/messages/{id}",
    tag = "moderation",
    params(("id" = Uuid, Path, description = "Message id")),
    responses(
        (status = 200, description = "Message soft-deleted", body = ModerationResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the message owner"),
        (status = 404, description = "Message not found")
    )
)]
pub async fn delete_message(
    Path(message_id): Path<Uuid>,
    State(state): State<GatewayState>,
    Extension(current_user): Extension<CurrentUser>,
) -> GatewayResult<Json<serde_json::Value>> {
    state
        .moderation_service
        .delete_message(message_id, current_user.id, current_user.is_admin)
        .await?;

    // Clients prune the message from local state without a full resync.
    state
        .hub
        .broadcast(ServerFrame::MessageDeleted(MessageDeleted { id: message_id }))
        .await;

    info!(message_id = %message_id, deleted_by = %current_user.id, "chat message deleted via rest");
    Ok(Json(json!({ "message": "Message deleted" })))
}

#[utoipa::path(
    post,
    path = "/api/chat/bans",
    tag = "moderation",
    request_body = BanUserRequest,
    responses(
        (status = 200, description = "User banned", body = ModerationResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin only")
    )
)]
pub async fn ban_user(
    State(state): State<GatewayState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<BanUserRequest>,
) -> GatewayResult<Json<serde_json::Value>> {
    if !current_user.is_admin {
        return Err(GatewayError::AuthorizationFailed(
            "Only admins can ban users".to_string(),
        ));
    }

    state
        .moderation_service
        .ban_user(
            payload.user_id,
            payload.reason,
            current_user.id,
            payload.duration_hours,
        )
        .await?;

    // A ban takes effect immediately: live sessions are torn down rather
    // than left to fail on their next send.
    let dropped = state.hub.disconnect_user(payload.user_id).await;
    info!(
        user_id = %payload.user_id,
        banned_by = %current_user.id,
        dropped_connections = dropped,
        "user banned from chat"
    );

    Ok(Json(json!({ "message": "User banned" })))
}

#[utoipa::path(
    delete,
    path = "/api/chat/bans/{user_id}",
    tag = "moderation",
    params(("user_id" = Uuid, Path, description = "User id")),
    responses(
        (status = 200, description = "User unbanned", body = ModerationResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin only")
    )
)]
pub async fn unban_user(
    Path(user_id): Path<Uuid>,
    State(state): State<GatewayState>,
    Extension(current_user): Extension<CurrentUser>,
) -> GatewayResult<Json<serde_json::Value>> {
    if !current_user.is_admin {
        return Err(GatewayError::AuthorizationFailed(
            "Only admins can unban users".to_string(),
        ));
    }

    state.moderation_service.unban_user(user_id).await?;
    info!(user_id = %user_id, unbanned_by = %current_user.id, "user unbanned from chat");

    Ok(Json(json!({ "message": "User unbanned" })))
}
