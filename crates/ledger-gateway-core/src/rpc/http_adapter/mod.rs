//! Native JSON-RPC client for ledger node RPC endpoints.
//!
//! Implements [`LedgerRpc`](super::LedgerRpc) over JSON-RPC using
//! `reqwest`, with HTTP(S) transport, basic auth and typed decoding of
//! node responses.

mod client;
mod connection;
mod parsing;
mod protocol;

pub use client::HttpRpcClient;
