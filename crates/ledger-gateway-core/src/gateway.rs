//! The node gateway: a read-only facade over a ledger node's RPC endpoint.
//!
//! A [`NodeGateway`] is only obtainable through [`NodeGateway::connect`],
//! which resolves the node-local constants (own identity, default vault
//! filter, counterparty) up front. Every other operation is a single
//! delegation to the shared [`LedgerRpc`] handle.

use std::collections::BTreeSet;
use std::num::NonZeroU32;
use std::sync::Arc;

use time::{OffsetDateTime, UtcOffset};
use tracing::{debug, info};

use crate::attachment::list_archive_entries;
use crate::error::{GatewayError, InitError};
use crate::rpc::LedgerRpc;
use crate::types::{
    HostAndPort, LegalName, NodeInfo, PageNumber, PageSpecification, Party, QueryCriteria,
    QueryFilter, SecureHash, Sort, SortAttribute, SortColumn, SortDirection, StateAndRef,
    StateStatus, VaultPage, DEFAULT_PAGE_SIZE,
};

// ==============================================================================
// Configuration
// ==============================================================================

/// Start-up settings for a gateway.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Partial name of the well-known counterparty. Must match exactly one
    /// party on the network.
    pub counterparty_name: String,
    /// Page size of the default vault filter.
    pub page_size: NonZeroU32,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            counterparty_name: "PartyC".to_owned(),
            page_size: NonZeroU32::new(DEFAULT_PAGE_SIZE).expect("DEFAULT_PAGE_SIZE is non-zero"),
        }
    }
}

// ==============================================================================
// Gateway
// ==============================================================================

pub struct NodeGateway {
    rpc: Arc<dyn LedgerRpc>,
    own_identity: Party,
    default_filter: QueryFilter,
    counterparty: Party,
}

impl NodeGateway {
    /// Initialize a gateway over an established RPC connection.
    ///
    /// Fails with [`GatewayError::Initialization`] when the node reports no
    /// legal identity or when `config.counterparty_name` does not match
    /// exactly one party. Transport failures surface as
    /// [`GatewayError::Connection`].
    pub async fn connect(
        rpc: Arc<dyn LedgerRpc>,
        config: &GatewayConfig,
    ) -> Result<Self, GatewayError> {
        let node_info = rpc.node_info().await?;
        let own_identity = node_info
            .primary_identity()
            .cloned()
            .ok_or(InitError::NoLegalIdentity)?;

        let default_filter = participant_filter(&own_identity, config.page_size);

        let mut candidates = rpc
            .parties_from_name(&config.counterparty_name, false)
            .await?;
        let counterparty = match candidates.len() {
            0 => {
                return Err(InitError::CounterpartyNotFound {
                    filter: config.counterparty_name.clone(),
                }
                .into())
            }
            1 => candidates.remove(0),
            _ => {
                return Err(InitError::AmbiguousCounterparty {
                    filter: config.counterparty_name.clone(),
                    candidates: candidates.into_iter().map(|p| p.name).collect(),
                }
                .into())
            }
        };

        info!(
            me = %own_identity.name,
            counterparty = %counterparty.name,
            platform_version = node_info.platform_version,
            "node gateway initialized"
        );

        Ok(Self {
            rpc,
            own_identity,
            default_filter,
            counterparty,
        })
    }

    pub fn own_identity(&self) -> &Party {
        &self.own_identity
    }

    pub fn legal_name(&self) -> &LegalName {
        &self.own_identity.name
    }

    pub fn counterparty(&self) -> &Party {
        &self.counterparty
    }

    /// Unconsumed linear states this node participates in, newest UUID
    /// first, every page.
    pub fn default_filter(&self) -> &QueryFilter {
        &self.default_filter
    }

    /// Organisation names of every other node on the network map.
    pub async fn peers(&self) -> Result<BTreeSet<String>, GatewayError> {
        let snapshot = self.rpc.network_map_snapshot().await?;
        Ok(self
            .peer_identities(&snapshot)
            .map(|party| party.name.organisation.clone())
            .collect())
    }

    /// Full X.500 names of every other node on the network map.
    pub async fn peer_names(&self) -> Result<BTreeSet<String>, GatewayError> {
        let snapshot = self.rpc.network_map_snapshot().await?;
        Ok(self
            .peer_identities(&snapshot)
            .map(|party| party.name.to_string())
            .collect())
    }

    /// The node's clock, converted to UTC.
    pub async fn server_time(&self) -> Result<OffsetDateTime, GatewayError> {
        let time = self.rpc.current_node_time().await?;
        Ok(time.to_offset(UtcOffset::UTC))
    }

    pub async fn addresses(&self) -> Result<Vec<HostAndPort>, GatewayError> {
        Ok(self.rpc.node_info().await?.addresses)
    }

    pub async fn identities(&self) -> Result<Vec<Party>, GatewayError> {
        Ok(self.rpc.node_info().await?.legal_identities)
    }

    pub async fn platform_version(&self) -> Result<u32, GatewayError> {
        Ok(self.rpc.node_info().await?.platform_version)
    }

    pub async fn notaries(&self) -> Result<Vec<Party>, GatewayError> {
        self.rpc.notary_identities().await
    }

    pub async fn flows(&self) -> Result<BTreeSet<String>, GatewayError> {
        self.rpc.registered_flows().await
    }

    /// Every unconsumed state visible to the node, unfiltered and unpaged.
    pub async fn states(&self) -> Result<Vec<StateAndRef>, GatewayError> {
        Ok(self.rpc.vault_query(None).await?.states)
    }

    /// Vault query with the default filter.
    pub async fn own_states(&self) -> Result<VaultPage, GatewayError> {
        self.rpc.vault_query(Some(&self.default_filter)).await
    }

    pub async fn open_attachment(&self, hash: &SecureHash) -> Result<Vec<u8>, GatewayError> {
        debug!(%hash, "open attachment");
        self.rpc.open_attachment(hash).await
    }

    /// Like [`open_attachment`](Self::open_attachment), taking the hash in
    /// its hex form. Unparseable input fails before any remote call.
    pub async fn open_attachment_str(&self, hash: &str) -> Result<Vec<u8>, GatewayError> {
        let hash: SecureHash = hash.parse()?;
        self.open_attachment(&hash).await
    }

    /// Entry names of an attachment archive.
    pub async fn attachment_entries(&self, hash: &SecureHash) -> Result<Vec<String>, GatewayError> {
        let contents = self.open_attachment(hash).await?;
        list_archive_entries(&contents)
    }

    /// Primary identities in `snapshot` outside this node's organisation.
    /// Nodes that list no identity are skipped.
    fn peer_identities<'a>(&'a self, snapshot: &'a [NodeInfo]) -> impl Iterator<Item = &'a Party> {
        let own_organisation = &self.own_identity.name.organisation;
        snapshot
            .iter()
            .filter_map(NodeInfo::primary_identity)
            .filter(move |party| party.name.organisation != *own_organisation)
    }
}

fn participant_filter(me: &Party, page_size: NonZeroU32) -> QueryFilter {
    QueryFilter {
        criteria: QueryCriteria::LinearState {
            participants: vec![me.clone()],
            status: StateStatus::Unconsumed,
        },
        paging: PageSpecification {
            page_number: PageNumber::All,
            page_size,
        },
        sort: Sort {
            columns: vec![SortColumn {
                attribute: SortAttribute::LinearStateUuid,
                direction: SortDirection::Desc,
            }],
        },
    }
}
