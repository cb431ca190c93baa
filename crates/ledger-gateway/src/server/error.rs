use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use ledger_gateway_core::GatewayError;

// ==============================================================================
// Error Type
// ==============================================================================

pub(crate) enum AppError {
    BadRequest(String),
    Unauthorized(String),
    NotFound(String),
    BadGateway(String),
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::BadGateway(msg) => (StatusCode::BAD_GATEWAY, msg),
            Self::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

impl From<GatewayError> for AppError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::MalformedInput(_) => Self::BadRequest(err.to_string()),
            GatewayError::NotFound(_) => Self::NotFound(err.to_string()),
            GatewayError::Connection(_) => {
                tracing::warn!(error = %err, "ledger node call failed");
                Self::BadGateway(err.to_string())
            }
            GatewayError::Initialization(_) => Self::Internal(err.to_string()),
        }
    }
}
