use axum::extract::{Path, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use ledger_gateway_core::types::SecureHash;

use super::error::AppError;
use super::SharedState;

#[derive(Serialize)]
pub(super) struct EntriesResponse {
    hash: SecureHash,
    entries: Vec<String>,
}

/// Stream the raw attachment bytes.
pub(super) async fn get_attachment(
    State(state): State<SharedState>,
    Path(hash): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let contents = state.gateway.open_attachment_str(&hash).await?;
    Ok((
        [(header::CONTENT_TYPE, "application/octet-stream")],
        contents,
    ))
}

pub(super) async fn get_attachment_entries(
    State(state): State<SharedState>,
    Path(hash_str): Path<String>,
) -> Result<Json<EntriesResponse>, AppError> {
    let hash: SecureHash = hash_str
        .parse()
        .map_err(|e| AppError::BadRequest(format!("invalid attachment hash: {e}")))?;
    let entries = state.gateway.attachment_entries(&hash).await?;
    Ok(Json(EntriesResponse { hash, entries }))
}
