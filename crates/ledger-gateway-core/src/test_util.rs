//! Shared test helpers for `ledger-gateway-core` unit tests.
//!
//! Builders for parties, node descriptors, vault states and attachment
//! archives so that tests across modules share a single source of truth
//! for dummy data construction.

use std::io::Write;

use crate::types::{
    HostAndPort, LegalName, NodeInfo, Party, PublicKey, SecureHash, StateAndRef, StateRef,
    TransactionState,
};

// ==============================================================================
// Identity Helpers
// ==============================================================================

/// A party named `O=<organisation>, L=London, C=GB` with a deterministic key.
pub fn party(organisation: &str) -> Party {
    Party {
        name: LegalName::new(organisation, "London", "GB"),
        owning_key: PublicKey(format!("key-{}", organisation.to_lowercase())),
    }
}

/// A node descriptor whose only legal identity is `party(organisation)`.
pub fn node(organisation: &str) -> NodeInfo {
    NodeInfo {
        addresses: vec![HostAndPort {
            host: format!("{}.example", organisation.to_lowercase()),
            port: 10002,
        }],
        legal_identities: vec![party(organisation)],
        platform_version: 4,
        serial: 1,
    }
}

// ==============================================================================
// Vault Helpers
// ==============================================================================

/// A linear state numbered `n`, notarised by `notary`.
pub fn linear_state(n: u8, notary: &Party) -> StateAndRef {
    StateAndRef {
        state: TransactionState {
            data: serde_json::json!({ "linearId": format!("state-{n}") }),
            contract: "com.example.contracts.IouContract".to_owned(),
            notary: notary.clone(),
        },
        state_ref: StateRef {
            txhash: SecureHash::sha256([n]),
            index: 0,
        },
    }
}

// ==============================================================================
// Attachment Helpers
// ==============================================================================

/// Build an in-memory ZIP archive holding `entries` as `(name, contents)`.
pub fn zip_archive(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    for (name, contents) in entries {
        writer
            .start_file(*name, zip::write::SimpleFileOptions::default())
            .expect("zip entry must start");
        writer.write_all(contents).expect("zip entry must write");
    }
    writer
        .finish()
        .expect("zip archive must finish")
        .into_inner()
}
