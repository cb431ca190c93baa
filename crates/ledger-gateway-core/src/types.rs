//! Value types mirrored from the ledger node's RPC surface.
//!
//! Identities (`LegalName`, `Party`), node introspection (`NodeInfo`,
//! `HostAndPort`), content hashes (`SecureHash`), vault results
//! (`StateAndRef`, `VaultPage`) and the query filter vocabulary
//! (`QueryFilter` and its parts). None of these are owned by the gateway;
//! they are transient reflections of remote state.

use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};

use crate::error::ParseError;

// ==============================================================================
// Legal Name
// ==============================================================================

/// An X.500 distinguished name identifying a network participant,
/// e.g. `O=PartyC, L=London, C=GB`.
///
/// Serialized as its textual form so it round-trips through JSON the same
/// way the node prints it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LegalName {
    pub common_name: Option<String>,
    pub organisation_unit: Option<String>,
    pub organisation: String,
    pub locality: String,
    pub state: Option<String>,
    pub country: String,
}

impl LegalName {
    pub fn new(organisation: &str, locality: &str, country: &str) -> Self {
        Self {
            common_name: None,
            organisation_unit: None,
            organisation: organisation.to_owned(),
            locality: locality.to_owned(),
            state: None,
            country: country.to_owned(),
        }
    }
}

impl fmt::Display for LegalName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut attrs: Vec<(&str, &str)> = Vec::with_capacity(6);
        if let Some(cn) = &self.common_name {
            attrs.push(("CN", cn.as_str()));
        }
        if let Some(ou) = &self.organisation_unit {
            attrs.push(("OU", ou.as_str()));
        }
        attrs.push(("O", self.organisation.as_str()));
        attrs.push(("L", self.locality.as_str()));
        if let Some(st) = &self.state {
            attrs.push(("ST", st.as_str()));
        }
        attrs.push(("C", self.country.as_str()));

        for (i, (key, value)) in attrs.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{key}={value}")?;
        }
        Ok(())
    }
}

impl FromStr for LegalName {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: String| ParseError::LegalName {
            input: s.to_owned(),
            reason,
        };

        let mut common_name = None;
        let mut organisation_unit = None;
        let mut organisation = None;
        let mut locality = None;
        let mut state = None;
        let mut country = None;

        for part in s.split(',') {
            let (key, value) = part
                .split_once('=')
                .ok_or_else(|| invalid(format!("attribute `{}` has no `=`", part.trim())))?;
            let key = key.trim().to_ascii_uppercase();
            let value = value.trim();
            if value.is_empty() {
                return Err(invalid(format!("attribute {key} is empty")));
            }

            let slot = match key.as_str() {
                "CN" => &mut common_name,
                "OU" => &mut organisation_unit,
                "O" => &mut organisation,
                "L" => &mut locality,
                "ST" => &mut state,
                "C" => &mut country,
                other => return Err(invalid(format!("unsupported attribute {other}"))),
            };
            if slot.replace(value.to_owned()).is_some() {
                return Err(invalid(format!("duplicate attribute {key}")));
            }
        }

        let organisation = organisation.ok_or_else(|| invalid("missing O".to_owned()))?;
        let locality = locality.ok_or_else(|| invalid("missing L".to_owned()))?;
        let country = country.ok_or_else(|| invalid("missing C".to_owned()))?;
        if country.len() != 2 || !country.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(invalid(format!(
                "country `{country}` must be a two-letter code"
            )));
        }

        Ok(Self {
            common_name,
            organisation_unit,
            organisation,
            locality,
            state,
            country: country.to_ascii_uppercase(),
        })
    }
}

impl Serialize for LegalName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for LegalName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

// ==============================================================================
// Parties and Node Info
// ==============================================================================

/// Encoded public key material as reported by the node.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PublicKey(pub String);

/// A well-known network identity: legal name plus owning key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Party {
    pub name: LegalName,
    pub owning_key: PublicKey,
}

/// A network address a node advertises for peer-to-peer messaging.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HostAndPort {
    pub host: String,
    pub port: u16,
}

impl fmt::Display for HostAndPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // IPv6 literals need brackets to stay unambiguous.
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

/// The node descriptor returned by `nodeInfo` and contained in network map
/// snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeInfo {
    pub addresses: Vec<HostAndPort>,
    pub legal_identities: Vec<Party>,
    pub platform_version: u32,
    #[serde(default)]
    pub serial: i64,
}

impl NodeInfo {
    /// The identity the node is known by on the network. Nodes list their
    /// well-known identity first.
    pub fn primary_identity(&self) -> Option<&Party> {
        self.legal_identities.first()
    }
}

// ==============================================================================
// Secure Hash
// ==============================================================================

/// A SHA-256 content hash, used to address attachments and transactions.
///
/// The textual form is 64 hex characters. Parsing accepts either case;
/// display is upper-case to match the node's own rendering.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SecureHash([u8; 32]);

impl SecureHash {
    const LEN: usize = 32;

    /// Hash `data` with SHA-256.
    pub fn sha256(data: impl AsRef<[u8]>) -> Self {
        Self(Sha256::digest(data.as_ref()).into())
    }
}

impl fmt::Display for SecureHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode_upper(self.0))
    }
}

impl fmt::Debug for SecureHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecureHash({self})")
    }
}

impl FromStr for SecureHash {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: String| ParseError::SecureHash {
            input: s.to_owned(),
            reason,
        };

        let trimmed = s.trim();
        if trimmed.len() != Self::LEN * 2 {
            return Err(invalid(format!(
                "expected {} hex characters, got {}",
                Self::LEN * 2,
                trimmed.len()
            )));
        }
        let mut bytes = [0u8; Self::LEN];
        hex::decode_to_slice(trimmed, &mut bytes).map_err(|e| invalid(e.to_string()))?;
        Ok(Self(bytes))
    }
}

impl Serialize for SecureHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SecureHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

// ==============================================================================
// Vault States
// ==============================================================================

/// Pointer to an output of a recorded transaction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StateRef {
    pub txhash: SecureHash,
    pub index: u32,
}

/// A contract state together with its governing contract and notary.
/// The state body itself is contract-specific and kept as raw JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionState {
    pub data: serde_json::Value,
    pub contract: String,
    pub notary: Party,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateAndRef {
    pub state: TransactionState,
    #[serde(rename = "ref")]
    pub state_ref: StateRef,
}

/// One result page of a vault query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultPage {
    pub states: Vec<StateAndRef>,
    /// Total number of matching states on the node, or `-1` when the query
    /// was not paged.
    pub total_states_available: i64,
}

// ==============================================================================
// Query Filter
// ==============================================================================

/// Default page size applied to vault queries issued with a filter.
pub const DEFAULT_PAGE_SIZE: u32 = 200;

/// Criteria, paging and sort order applied to a vault query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryFilter {
    pub criteria: QueryCriteria,
    pub paging: PageSpecification,
    pub sort: Sort,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum QueryCriteria {
    /// Linear states in which any of `participants` take part.
    #[serde(rename_all = "camelCase")]
    LinearState {
        participants: Vec<Party>,
        status: StateStatus,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StateStatus {
    Unconsumed,
    Consumed,
    All,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    pub columns: Vec<SortColumn>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortColumn {
    pub attribute: SortAttribute,
    pub direction: SortDirection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SortAttribute {
    /// The stable unique identifier of a linear state.
    LinearStateUuid,
    LinearStateExternalId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSpecification {
    pub page_number: PageNumber,
    pub page_size: NonZeroU32,
}

/// Which page of results to fetch.
///
/// On the wire `All` is encoded as `-1`, the node's sentinel for "every
/// page", and `Page(n)` as `n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageNumber {
    All,
    Page(NonZeroU32),
}

impl Serialize for PageNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::All => serializer.serialize_i64(-1),
            Self::Page(n) => serializer.serialize_i64(i64::from(n.get())),
        }
    }
}

impl<'de> Deserialize<'de> for PageNumber {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = i64::deserialize(deserializer)?;
        if raw == -1 {
            return Ok(Self::All);
        }
        u32::try_from(raw)
            .ok()
            .and_then(NonZeroU32::new)
            .map(Self::Page)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid page number {raw}")))
    }
}
