//! # Reelhub Gateway Crate
//!
//! The API gateway for the reelhub chat backend: the WebSocket chat hub
//! with its per-connection client actors, and the REST surface around it
//! (history, presence, moderation).
//!
//! ## Architecture
//!
//! - **websocket**: frame protocol, connection registry (hub), client actor
//! - **rest**: HTTP API endpoints with OpenAPI documentation
//! - **state**: shared application state wiring services to repositories
//! - **middleware**: session authentication

pub mod error;
pub mod middleware;
pub mod rest;
pub mod state;
pub mod websocket;

// Re-export main types for convenience
pub use error::{GatewayError, GatewayResult};
pub use middleware::auth_middleware;
pub use state::GatewayState;
pub use websocket::hub::{ChatHub, HubConfig};

use axum::{http::Method, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the main application router with all routes
pub fn create_router(state: GatewayState) -> Router {
    #[allow(unused_mut)]
    let mut router = Router::new()
        // REST API routes
        .nest("/api", rest::create_rest_routes(state.clone()))
        .merge(rest::health::create_health_routes())
        // WebSocket routes
        .merge(websocket::create_websocket_routes())
        // CORS middleware
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::DELETE])
                .allow_headers(Any),
        )
        // Request logging
        .layer(TraceLayer::new_for_http());

    // Add Swagger UI in debug builds
    #[cfg(debug_assertions)]
    {
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;

        #[derive(OpenApi)]
        #[openapi(
            paths(
                rest::health::health,
                rest::chat::list_messages,
                rest::chat::online_count,
                rest::moderation::delete_message,
                rest::moderation::ban_user,
                rest::moderation::unban_user,
            ),
            components(
                schemas(
                    rest::health::HealthResponse,
                    rest::chat::OnlineCountResponse,
                    rest::moderation::BanUserRequest,
                    rest::moderation::ModerationResponse,
                )
            ),
            tags(
                (name = "chat", description = "Chat history and presence"),
                (name = "moderation", description = "Bans and message deletion"),
                (name = "health", description = "Service health"),
            )
        )]
        struct ApiDoc;

        router = router.merge(
            SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()),
        );
    }

    router.with_state(state)
}
