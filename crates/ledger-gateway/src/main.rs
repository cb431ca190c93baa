mod cli;
mod server;

use std::sync::Arc;

use clap::Parser;
use eyre::{eyre, WrapErr};

use ledger_gateway_core::rpc::{HttpRpcClient, LedgerRpc};
use ledger_gateway_core::{GatewayConfig, GatewayError, NodeGateway};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let args = cli::Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_file(true)
        .with_line_number(true)
        .with_level(true)
        .init();

    // Generate a random API token for this server session.
    let api_token = {
        use rand::Rng;
        let bytes: [u8; 16] = rand::thread_rng().r#gen();
        hex::encode(bytes)
    };

    let rpc: Arc<dyn LedgerRpc> = Arc::new(
        HttpRpcClient::new(
            &args.rpc_url,
            args.rpc_user.as_deref(),
            args.rpc_pass.as_deref(),
        )
        .context("configure ledger node RPC client")?,
    );

    // Resolve identity and counterparty before accepting any request; a
    // gateway that cannot initialize never serves.
    let config = GatewayConfig {
        counterparty_name: args.counterparty.clone(),
        page_size: args.page_size,
    };
    let gateway = NodeGateway::connect(rpc, &config)
        .await
        .map_err(|err| match err {
            GatewayError::Connection(_) => {
                let message = format_rpc_connect_error(&args.rpc_url, &err.to_string());
                eyre!(message).wrap_err("while attempting to connect to the ledger node RPC")
            }
            other => eyre!(other).wrap_err("while initializing the node gateway"),
        })?;

    tracing::info!(
        me = %gateway.legal_name(),
        counterparty = %gateway.counterparty().name,
        "connected to ledger node"
    );

    let bind_addr = format!("{}:{}", args.bind, args.port);
    let origin = format!("http://{}:{}", args.bind, args.port);
    let state = server::AppState {
        gateway,
        api_token: api_token.clone(),
    };
    let router = server::build_router(state, &origin);

    if args.bind == "0.0.0.0" {
        tracing::warn!("server is bound to 0.0.0.0 — it is accessible from the network");
    }

    println!();
    println!("  Ledger gateway is running:");
    println!("    URL:       http://{bind_addr}/api/v1/health");
    println!("    API token: {api_token}");
    println!();

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .context("bind TCP listener")?;

    tracing::info!("listening on {bind_addr}");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("run HTTP server")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

fn format_rpc_connect_error(rpc_url: &str, source_error: &str) -> String {
    let mut lines = vec![
        format!("could not connect to RPC endpoint `{rpc_url}`"),
        format!("RPC error: {source_error}"),
    ];

    if source_error.contains("dns error") {
        lines.push(
            "hint: hostname resolution failed; verify the node hostname and your DNS/network"
                .into(),
        );
    } else if source_error.contains("tls") || source_error.contains("certificate") {
        lines.push(
            "hint: TLS handshake failed; verify certificate trust and that the endpoint uses HTTPS"
                .into(),
        );
    } else if source_error.contains("401") || source_error.contains("403") {
        lines.push("hint: authentication failed; verify --rpc-user/--rpc-pass".into());
    } else if source_error.contains("Connection refused")
        || source_error.contains("error sending request for url")
    {
        lines.push(
            "hint: the node did not answer; verify it is running and its RPC port is reachable"
                .into(),
        );
    }

    lines.join("\n")
}
