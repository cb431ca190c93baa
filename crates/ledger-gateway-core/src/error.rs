use crate::types::LegalName;

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("gateway initialization failed: {0}")]
    Initialization(#[from] InitError),

    #[error("RPC communication failure: {0}")]
    Connection(#[from] RpcError),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("malformed input: {0}")]
    MalformedInput(String),
}

/// Start-up preconditions that prevent a gateway from becoming ready.
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("node info lists no legal identities")]
    NoLegalIdentity,

    #[error("no network party matches counterparty name `{filter}`")]
    CounterpartyNotFound { filter: String },

    #[error("counterparty name `{filter}` is ambiguous; matches: {}", format_candidates(.candidates))]
    AmbiguousCounterparty {
        filter: String,
        candidates: Vec<LegalName>,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server error {code}: {message}")]
    ServerError { code: i64, message: String },

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

fn format_candidates(candidates: &[LegalName]) -> String {
    candidates
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Failure to parse one of the node's textual value encodings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("invalid X.500 name `{input}`: {reason}")]
    LegalName { input: String, reason: String },

    #[error("invalid secure hash `{input}`: {reason}")]
    SecureHash { input: String, reason: String },
}

impl From<ParseError> for GatewayError {
    fn from(err: ParseError) -> Self {
        Self::MalformedInput(err.to_string())
    }
}
