use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;

use super::error::AppError;
use super::SharedState;

pub(super) const API_TOKEN_HEADER: &str = "x-api-token";

/// Reject requests whose `X-API-Token` header does not carry the session
/// token.
pub(super) async fn require_api_token(
    State(state): State<SharedState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get(API_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    if token != state.api_token {
        return Err(AppError::Unauthorized(
            "invalid or missing X-API-Token".to_string(),
        ));
    }
    Ok(next.run(request).await)
}
