mod attachments;
mod auth;
mod error;
mod node;

use std::sync::Arc;

use axum::middleware;
use axum::routing::{any, get};
use axum::{Json, Router};
use tower_http::cors::{AllowOrigin, CorsLayer};

use ledger_gateway_core::NodeGateway;

// ==============================================================================
// Application State
// ==============================================================================

pub struct AppState {
    pub gateway: NodeGateway,
    pub api_token: String,
}

type SharedState = Arc<AppState>;

// ==============================================================================
// Router
// ==============================================================================

pub fn build_router(state: AppState, origin: &str) -> Router {
    // Only reflect the allowed origin when the request's Origin header
    // actually matches. Otherwise, omit the header entirely so browsers
    // get a clean CORS rejection instead of a mismatched origin value.
    let allowed: axum::http::HeaderValue = origin.parse().expect("valid origin header value");
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::predicate({
            let allowed = allowed.clone();
            move |request_origin: &axum::http::HeaderValue, _| *request_origin == allowed
        }))
        .allow_methods([axum::http::Method::GET, axum::http::Method::OPTIONS])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::HeaderName::from_static(auth::API_TOKEN_HEADER),
        ]);

    let shared = Arc::new(state);

    let public_api = Router::new().route("/api/v1/health", get(health));

    let protected_api = Router::new()
        .route("/api/v1/me", get(node::get_me))
        .route("/api/v1/peers", get(node::get_peers))
        .route("/api/v1/peer-names", get(node::get_peer_names))
        .route("/api/v1/server-time", get(node::get_server_time))
        .route("/api/v1/addresses", get(node::get_addresses))
        .route("/api/v1/identities", get(node::get_identities))
        .route("/api/v1/platform-version", get(node::get_platform_version))
        .route("/api/v1/notaries", get(node::get_notaries))
        .route("/api/v1/flows", get(node::get_flows))
        .route("/api/v1/states", get(node::get_states))
        .route("/api/v1/states/mine", get(node::get_own_states))
        .route(
            "/api/v1/attachments/{hash}",
            get(attachments::get_attachment),
        )
        .route(
            "/api/v1/attachments/{hash}/entries",
            get(attachments::get_attachment_entries),
        )
        .route_layer(middleware::from_fn_with_state(
            shared.clone(),
            auth::require_api_token,
        ));

    Router::new()
        .merge(public_api)
        .merge(protected_api)
        .route("/api", any(api_not_found))
        .route("/api/{*path}", any(api_not_found))
        .layer(cors)
        .with_state(shared)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn api_not_found() -> error::AppError {
    error::AppError::NotFound("API route not found".to_string())
}
