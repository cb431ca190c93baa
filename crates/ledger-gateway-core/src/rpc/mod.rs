//! Ledger node RPC abstraction layer.
//!
//! Defines the [`LedgerRpc`] trait and provides an HTTP JSON-RPC
//! implementation ([`HttpRpcClient`]) plus a test mock (`mock::MockRpc`).

mod http_adapter;
#[cfg(test)]
pub mod mock;

pub use http_adapter::HttpRpcClient;

use std::collections::BTreeSet;

use async_trait::async_trait;
use time::OffsetDateTime;

use crate::error::GatewayError;
use crate::types::{NodeInfo, Party, QueryFilter, SecureHash, VaultPage};

/// Minimal trait covering the node RPC operations the gateway needs.
///
/// Implementations are expected to handle authentication, connection
/// management, and response deserialization internally. The handle is
/// shared by all concurrent callers, so it must be usable through `&self`.
#[async_trait]
pub trait LedgerRpc: Send + Sync {
    /// Describe the node this connection is attached to.
    async fn node_info(&self) -> Result<NodeInfo, GatewayError>;

    /// All nodes currently on the network map, including this one.
    async fn network_map_snapshot(&self) -> Result<Vec<NodeInfo>, GatewayError>;

    /// The node's wall-clock time. May carry any offset.
    async fn current_node_time(&self) -> Result<OffsetDateTime, GatewayError>;

    async fn notary_identities(&self) -> Result<Vec<Party>, GatewayError>;

    /// Class names of the flows the node can start over RPC.
    async fn registered_flows(&self) -> Result<BTreeSet<String>, GatewayError>;

    /// Query the vault. `None` applies the node's defaults: all unconsumed
    /// states, unpaged.
    async fn vault_query(&self, filter: Option<&QueryFilter>) -> Result<VaultPage, GatewayError>;

    /// Download attachment contents. Unknown hashes fail with
    /// [`GatewayError::NotFound`].
    async fn open_attachment(&self, hash: &SecureHash) -> Result<Vec<u8>, GatewayError>;

    /// Resolve well-known parties by name. With `exact_match = false` the
    /// node matches case-insensitively on any part of the X.500 name.
    async fn parties_from_name(
        &self,
        query: &str,
        exact_match: bool,
    ) -> Result<Vec<Party>, GatewayError>;
}
