use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use reqwest::header;
use time::OffsetDateTime;
use tracing::{debug, trace};

use crate::error::{GatewayError, RpcError};
use crate::types::{NodeInfo, Party, QueryFilter, SecureHash, VaultPage};

use super::super::LedgerRpc;
use super::connection::{parse_connection, resolve_auth};
use super::parsing::{decode_result, parse_attachment_bytes, parse_node_time};
use super::protocol::{parse_jsonrpc_error, JsonRpcRequest, JsonRpcResponse};

/// JSON-RPC error code a node uses for an unknown attachment.
const ATTACHMENT_NOT_FOUND_CODE: i64 = -32004;
/// Generic server-side failure; carries the node's exception text.
const INTERNAL_ERROR_CODE: i64 = -32603;

/// Ledger node JSON-RPC client over HTTP(S).
///
/// Every trait method maps to exactly one HTTP request. There is no retry,
/// caching or batching: failures surface to the caller as they happen.
pub struct HttpRpcClient {
    client: reqwest::Client,
    url: String,
    auth: Option<(String, String)>,
    next_id: AtomicU64,
}

impl HttpRpcClient {
    /// Create a new client for an HTTP URL.
    ///
    /// `connection` must be an `http://...` or `https://...` URL. `user` and
    /// `pass` enable basic auth and must be given together.
    pub fn new(
        connection: &str,
        user: Option<&str>,
        pass: Option<&str>,
    ) -> Result<Self, GatewayError> {
        let auth = resolve_auth(user, pass)?;
        let url = parse_connection(connection)?;

        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(30))
            .pool_max_idle_per_host(32)
            .tcp_nodelay(true)
            .build()
            .expect("reqwest client builder uses valid static config");

        Ok(Self {
            client,
            url,
            auth,
            next_id: AtomicU64::new(initial_request_id()),
        })
    }

    async fn rpc_call(
        &self,
        method: &str,
        params: Vec<serde_json::Value>,
    ) -> Result<serde_json::Value, GatewayError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        debug!(
            rpc.id = id,
            rpc.method = method,
            rpc.params = params.len(),
            "rpc call"
        );
        let req = JsonRpcRequest {
            jsonrpc: "2.0",
            id,
            method,
            params,
        };

        let mut builder = self
            .client
            .post(&self.url)
            .header(header::CONTENT_TYPE, "application/json")
            .json(&req);
        if let Some((ref user, ref pass)) = self.auth {
            builder = builder.basic_auth(user, Some(pass));
        }

        let response = builder.send().await.map_err(RpcError::Transport)?;
        let status = response.status();

        let body = response.text().await.map_err(RpcError::Transport)?;
        debug!(rpc.id = id, rpc.method = method, %status, body_len = body.len(), "rpc response");
        trace!(rpc.id = id, rpc.method = method, body = %body, "rpc response body");

        let decoded: JsonRpcResponse = serde_json::from_str(&body).map_err(|e| {
            RpcError::InvalidResponse(format!("decode JSON-RPC response: {e}; status={status}"))
        })?;

        if let Some(err) = decoded.error {
            return Err(parse_jsonrpc_error(err));
        }

        Ok(decoded.result.unwrap_or(serde_json::Value::Null))
    }
}

#[async_trait]
impl LedgerRpc for HttpRpcClient {
    async fn node_info(&self) -> Result<NodeInfo, GatewayError> {
        let raw = self.rpc_call("nodeInfo", Vec::new()).await?;
        decode_result("nodeInfo", raw)
    }

    async fn network_map_snapshot(&self) -> Result<Vec<NodeInfo>, GatewayError> {
        let raw = self.rpc_call("networkMapSnapshot", Vec::new()).await?;
        decode_result("networkMapSnapshot", raw)
    }

    async fn current_node_time(&self) -> Result<OffsetDateTime, GatewayError> {
        let raw = self.rpc_call("currentNodeTime", Vec::new()).await?;
        parse_node_time(&raw)
    }

    async fn notary_identities(&self) -> Result<Vec<Party>, GatewayError> {
        let raw = self.rpc_call("notaryIdentities", Vec::new()).await?;
        decode_result("notaryIdentities", raw)
    }

    async fn registered_flows(&self) -> Result<BTreeSet<String>, GatewayError> {
        let raw = self.rpc_call("registeredFlows", Vec::new()).await?;
        decode_result("registeredFlows", raw)
    }

    async fn vault_query(&self, filter: Option<&QueryFilter>) -> Result<VaultPage, GatewayError> {
        let params = match filter {
            None => Vec::new(),
            Some(filter) => vec![serde_json::to_value(filter).map_err(|e| {
                GatewayError::MalformedInput(format!("encode vault query filter: {e}"))
            })?],
        };
        let raw = self.rpc_call("vaultQueryBy", params).await?;
        decode_result("vaultQueryBy", raw)
    }

    async fn open_attachment(&self, hash: &SecureHash) -> Result<Vec<u8>, GatewayError> {
        let raw = self
            .rpc_call("openAttachment", vec![serde_json::json!(hash.to_string())])
            .await
            .map_err(|err| normalize_open_attachment_error(hash, err))?;
        parse_attachment_bytes(&raw)
    }

    async fn parties_from_name(
        &self,
        query: &str,
        exact_match: bool,
    ) -> Result<Vec<Party>, GatewayError> {
        let raw = self
            .rpc_call(
                "partiesFromName",
                vec![serde_json::json!(query), serde_json::json!(exact_match)],
            )
            .await?;
        decode_result("partiesFromName", raw)
    }
}

fn initial_request_id() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(1)
}

// ==============================================================================
// RPC Error Normalization
// ==============================================================================

/// Convert "unknown attachment" JSON-RPC responses into `NotFound`.
///
/// This keeps not-found semantics strongly typed for upstream HTTP mapping,
/// while preserving other RPC/transport failures as-is.
fn normalize_open_attachment_error(hash: &SecureHash, err: GatewayError) -> GatewayError {
    match err {
        GatewayError::Connection(RpcError::ServerError { code, message })
            if is_attachment_not_found_server_error(code, &message) =>
        {
            GatewayError::NotFound(format!("attachment {hash}"))
        }
        other => other,
    }
}

fn is_attachment_not_found_server_error(code: i64, message: &str) -> bool {
    match code {
        ATTACHMENT_NOT_FOUND_CODE => true,
        INTERNAL_ERROR_CODE => {
            let msg = message.to_ascii_lowercase();
            msg.contains("attachmentnotfound") || msg.contains("no such attachment")
        }
        _ => false,
    }
}
