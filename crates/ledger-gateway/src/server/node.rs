use std::collections::BTreeSet;

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use time::format_description::well_known::Rfc3339;

use ledger_gateway_core::types::{Party, StateAndRef, VaultPage};

use super::error::AppError;
use super::SharedState;

// ==============================================================================
// DTOs
// ==============================================================================

#[derive(Serialize)]
pub(super) struct MeResponse {
    me: String,
    counterparty: String,
}

#[derive(Serialize)]
pub(super) struct PeersResponse {
    peers: BTreeSet<String>,
}

#[derive(Serialize)]
pub(super) struct ServerTimeResponse {
    server_time: String,
}

#[derive(Serialize)]
pub(super) struct AddressesResponse {
    addresses: Vec<String>,
}

#[derive(Serialize)]
pub(super) struct IdentitiesResponse {
    identities: Vec<Party>,
}

#[derive(Serialize)]
pub(super) struct PlatformVersionResponse {
    platform_version: u32,
}

#[derive(Serialize)]
pub(super) struct NotariesResponse {
    notaries: Vec<Party>,
}

#[derive(Serialize)]
pub(super) struct FlowsResponse {
    flows: BTreeSet<String>,
}

#[derive(Serialize)]
pub(super) struct StatesResponse {
    states: Vec<StateAndRef>,
}

// ==============================================================================
// Handlers
// ==============================================================================

pub(super) async fn get_me(State(state): State<SharedState>) -> Json<MeResponse> {
    Json(MeResponse {
        me: state.gateway.legal_name().to_string(),
        counterparty: state.gateway.counterparty().name.to_string(),
    })
}

pub(super) async fn get_peers(
    State(state): State<SharedState>,
) -> Result<Json<PeersResponse>, AppError> {
    let peers = state.gateway.peers().await?;
    Ok(Json(PeersResponse { peers }))
}

pub(super) async fn get_peer_names(
    State(state): State<SharedState>,
) -> Result<Json<PeersResponse>, AppError> {
    let peers = state.gateway.peer_names().await?;
    Ok(Json(PeersResponse { peers }))
}

pub(super) async fn get_server_time(
    State(state): State<SharedState>,
) -> Result<Json<ServerTimeResponse>, AppError> {
    let server_time = state
        .gateway
        .server_time()
        .await?
        .format(&Rfc3339)
        .map_err(|e| AppError::Internal(format!("format server time: {e}")))?;
    Ok(Json(ServerTimeResponse { server_time }))
}

pub(super) async fn get_addresses(
    State(state): State<SharedState>,
) -> Result<Json<AddressesResponse>, AppError> {
    let addresses = state
        .gateway
        .addresses()
        .await?
        .iter()
        .map(ToString::to_string)
        .collect();
    Ok(Json(AddressesResponse { addresses }))
}

pub(super) async fn get_identities(
    State(state): State<SharedState>,
) -> Result<Json<IdentitiesResponse>, AppError> {
    let identities = state.gateway.identities().await?;
    Ok(Json(IdentitiesResponse { identities }))
}

pub(super) async fn get_platform_version(
    State(state): State<SharedState>,
) -> Result<Json<PlatformVersionResponse>, AppError> {
    let platform_version = state.gateway.platform_version().await?;
    Ok(Json(PlatformVersionResponse { platform_version }))
}

pub(super) async fn get_notaries(
    State(state): State<SharedState>,
) -> Result<Json<NotariesResponse>, AppError> {
    let notaries = state.gateway.notaries().await?;
    Ok(Json(NotariesResponse { notaries }))
}

pub(super) async fn get_flows(
    State(state): State<SharedState>,
) -> Result<Json<FlowsResponse>, AppError> {
    let flows = state.gateway.flows().await?;
    Ok(Json(FlowsResponse { flows }))
}

pub(super) async fn get_states(
    State(state): State<SharedState>,
) -> Result<Json<StatesResponse>, AppError> {
    let states = state.gateway.states().await?;
    Ok(Json(StatesResponse { states }))
}

pub(super) async fn get_own_states(
    State(state): State<SharedState>,
) -> Result<Json<VaultPage>, AppError> {
    Ok(Json(state.gateway.own_states().await?))
}
