//! REST endpoints for the gateway

pub mod chat;
pub mod health;
pub mod moderation;

use axum::{middleware as axum_middleware, Router};

use crate::middleware::auth_middleware;
use crate::state::GatewayState;

/// Create all REST routes. Moderation endpoints sit behind the session
/// auth middleware; history and presence reads are public.
pub fn create_rest_routes(state: GatewayState) -> Router<GatewayState> {
    let moderation = moderation::create_moderation_routes().route_layer(
        axum_middleware::from_fn_with_state(state, auth_middleware),
    );

    Router::new()
        .merge(chat::create_chat_routes())
        .merge(moderation)
}
