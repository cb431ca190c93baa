use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use time::OffsetDateTime;

use crate::error::{GatewayError, RpcError};
use crate::types::{NodeInfo, Party, QueryFilter, SecureHash, StateAndRef, VaultPage};

use super::LedgerRpc;

/// A mock ledger node for testing. Serves canned node data populated via the
/// builder pattern and counts every remote call it receives.
pub struct MockRpc {
    node_info: NodeInfo,
    network: Vec<NodeInfo>,
    notaries: Vec<Party>,
    flows: BTreeSet<String>,
    states: Vec<StateAndRef>,
    attachments: HashMap<SecureHash, Vec<u8>>,
    time: OffsetDateTime,
    unavailable: bool,
    calls: AtomicUsize,
    last_filter: Mutex<Option<QueryFilter>>,
}

impl MockRpc {
    /// Start a builder for a node whose own descriptor is `node_info`. The
    /// node is also placed on the network map.
    pub fn builder(node_info: NodeInfo) -> MockRpcBuilder {
        MockRpcBuilder {
            network: vec![node_info.clone()],
            node_info,
            notaries: Vec::new(),
            flows: BTreeSet::new(),
            states: Vec::new(),
            attachments: HashMap::new(),
            time: OffsetDateTime::UNIX_EPOCH,
            unavailable: false,
        }
    }

    /// Number of RPC calls served so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The filter passed to the most recent filtered vault query.
    pub fn last_filter(&self) -> Option<QueryFilter> {
        self.last_filter
            .lock()
            .expect("mock filter lock poisoned")
            .clone()
    }

    fn record_call(&self) -> Result<(), GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.unavailable {
            return Err(RpcError::ServerError {
                code: -32000,
                message: "connection refused".to_owned(),
            }
            .into());
        }
        Ok(())
    }
}

pub struct MockRpcBuilder {
    node_info: NodeInfo,
    network: Vec<NodeInfo>,
    notaries: Vec<Party>,
    flows: BTreeSet<String>,
    states: Vec<StateAndRef>,
    attachments: HashMap<SecureHash, Vec<u8>>,
    time: OffsetDateTime,
    unavailable: bool,
}

impl MockRpcBuilder {
    pub fn with_peer(mut self, peer: NodeInfo) -> Self {
        self.network.push(peer);
        self
    }

    pub fn with_notary(mut self, notary: Party) -> Self {
        self.notaries.push(notary);
        self
    }

    pub fn with_flow(mut self, flow: &str) -> Self {
        self.flows.insert(flow.to_owned());
        self
    }

    pub fn with_state(mut self, state: StateAndRef) -> Self {
        self.states.push(state);
        self
    }

    /// Store `contents` under their SHA-256 hash.
    pub fn with_attachment(mut self, contents: &[u8]) -> Self {
        self.attachments
            .insert(SecureHash::sha256(contents), contents.to_vec());
        self
    }

    pub fn with_time(mut self, time: OffsetDateTime) -> Self {
        self.time = time;
        self
    }

    /// Make every call fail as if the transport went away.
    pub fn unavailable(mut self) -> Self {
        self.unavailable = true;
        self
    }

    pub fn build(self) -> MockRpc {
        MockRpc {
            node_info: self.node_info,
            network: self.network,
            notaries: self.notaries,
            flows: self.flows,
            states: self.states,
            attachments: self.attachments,
            time: self.time,
            unavailable: self.unavailable,
            calls: AtomicUsize::new(0),
            last_filter: Mutex::new(None),
        }
    }
}

#[async_trait]
impl LedgerRpc for MockRpc {
    async fn node_info(&self) -> Result<NodeInfo, GatewayError> {
        self.record_call()?;
        Ok(self.node_info.clone())
    }

    async fn network_map_snapshot(&self) -> Result<Vec<NodeInfo>, GatewayError> {
        self.record_call()?;
        Ok(self.network.clone())
    }

    async fn current_node_time(&self) -> Result<OffsetDateTime, GatewayError> {
        self.record_call()?;
        Ok(self.time)
    }

    async fn notary_identities(&self) -> Result<Vec<Party>, GatewayError> {
        self.record_call()?;
        Ok(self.notaries.clone())
    }

    async fn registered_flows(&self) -> Result<BTreeSet<String>, GatewayError> {
        self.record_call()?;
        Ok(self.flows.clone())
    }

    async fn vault_query(&self, filter: Option<&QueryFilter>) -> Result<VaultPage, GatewayError> {
        self.record_call()?;
        let total_states_available = match filter {
            None => -1,
            Some(filter) => {
                *self.last_filter.lock().expect("mock filter lock poisoned") =
                    Some(filter.clone());
                self.states.len() as i64
            }
        };
        Ok(VaultPage {
            states: self.states.clone(),
            total_states_available,
        })
    }

    async fn open_attachment(&self, hash: &SecureHash) -> Result<Vec<u8>, GatewayError> {
        self.record_call()?;
        self.attachments
            .get(hash)
            .cloned()
            .ok_or_else(|| GatewayError::NotFound(format!("attachment {hash}")))
    }

    async fn parties_from_name(
        &self,
        query: &str,
        exact_match: bool,
    ) -> Result<Vec<Party>, GatewayError> {
        self.record_call()?;
        let query = query.to_lowercase();
        let matches = self
            .network
            .iter()
            .flat_map(|node| node.legal_identities.iter())
            .filter(|party| {
                let name = &party.name;
                [
                    name.common_name.as_deref(),
                    name.organisation_unit.as_deref(),
                    Some(name.organisation.as_str()),
                    Some(name.locality.as_str()),
                    name.state.as_deref(),
                    Some(name.country.as_str()),
                ]
                .into_iter()
                .flatten()
                .map(str::to_lowercase)
                .any(|attr| {
                    if exact_match {
                        attr == query
                    } else {
                        attr.contains(&query)
                    }
                })
            })
            .cloned()
            .collect();
        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::*;

    #[tokio::test]
    async fn fuzzy_party_lookup_matches_substring_case_insensitively() {
        let rpc = MockRpc::builder(node("PartyA"))
            .with_peer(node("PartyB"))
            .with_peer(node("PartyC"))
            .build();

        let found = rpc
            .parties_from_name("partyc", false)
            .await
            .expect("lookup must succeed");
        assert_eq!(found, vec![party("PartyC")]);

        let all = rpc
            .parties_from_name("Party", false)
            .await
            .expect("lookup must succeed");
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn exact_party_lookup_requires_whole_attribute() {
        let rpc = MockRpc::builder(node("PartyA")).build();
        let found = rpc
            .parties_from_name("Party", true)
            .await
            .expect("lookup must succeed");
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn unavailable_mock_fails_every_call() {
        let rpc = MockRpc::builder(node("PartyA")).unavailable().build();
        let err = rpc.node_info().await.expect_err("must fail");
        assert!(matches!(err, GatewayError::Connection(_)));
        assert_eq!(rpc.calls(), 1);
    }
}
