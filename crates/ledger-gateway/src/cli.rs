use std::num::NonZeroU32;

use clap::Parser;

/// Ledger gateway — read-only HTTP API over a ledger node's RPC interface.
#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    /// Ledger node JSON-RPC URL.
    #[arg(
        long,
        default_value = "http://127.0.0.1:10006/rpc",
        env = "LEDGER_GATEWAY_RPC_URL"
    )]
    pub rpc_url: String,

    /// RPC username (optional).
    #[arg(long, env = "LEDGER_GATEWAY_RPC_USER")]
    pub rpc_user: Option<String>,

    /// RPC password (optional).
    #[arg(long, env = "LEDGER_GATEWAY_RPC_PASS")]
    pub rpc_pass: Option<String>,

    /// Partial name of the well-known counterparty; must match exactly one
    /// network party.
    #[arg(long, default_value = "PartyC", env = "LEDGER_GATEWAY_COUNTERPARTY")]
    pub counterparty: String,

    /// Page size of the default vault query.
    #[arg(long, default_value = "200", env = "LEDGER_GATEWAY_PAGE_SIZE")]
    pub page_size: NonZeroU32,

    /// Address to bind the web server to.
    #[arg(long, default_value = "127.0.0.1", env = "LEDGER_GATEWAY_BIND")]
    pub bind: String,

    /// Port to listen on.
    #[arg(long, default_value = "8080", env = "LEDGER_GATEWAY_PORT")]
    pub port: u16,
}
