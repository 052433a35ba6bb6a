//! Error types for the gateway layer

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Gateway error types
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Authorization failed: {0}")]
    AuthorizationFailed(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Internal server error: {0}")]
    InternalError(String),

    #[error("Service error: {0}")]
    ServiceError(String),
}

impl GatewayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::AuthenticationFailed(_) => StatusCode::UNAUTHORIZED,
            GatewayError::AuthorizationFailed(_) => StatusCode::FORBIDDEN,
            GatewayError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            GatewayError::NotFound(_) => StatusCode::NOT_FOUND,
            GatewayError::InternalError(_) | GatewayError::ServiceError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_response = json!({
            "error": status.as_str(),
            "message": self.to_string(),
        });

        (status, Json(error_response)).into_response()
    }
}

/// Result type for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Convert from domain error types
impl From<reelhub_chat::ChatError> for GatewayError {
    fn from(error: reelhub_chat::ChatError) -> Self {
        use reelhub_chat::ChatError;
        match error {
            ChatError::Validation(message) => GatewayError::InvalidRequest(message),
            ChatError::Banned => GatewayError::AuthorizationFailed(error.to_string()),
            ChatError::MessageNotFound => GatewayError::NotFound("Message not found".to_string()),
            ChatError::NotMessageOwner => GatewayError::AuthorizationFailed(error.to_string()),
            ChatError::Storage(message) => GatewayError::ServiceError(message),
        }
    }
}

impl From<reelhub_users::AuthError> for GatewayError {
    fn from(error: reelhub_users::AuthError) -> Self {
        GatewayError::AuthenticationFailed(error.to_string())
    }
}

impl From<reelhub_users::UserError> for GatewayError {
    fn from(error: reelhub_users::UserError) -> Self {
        use reelhub_users::UserError;
        match error {
            UserError::UserNotFound => GatewayError::NotFound("User not found".to_string()),
            UserError::DatabaseError(message) => GatewayError::ServiceError(message),
        }
    }
}
