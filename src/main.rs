//! LC Gateway
//!
//! Serves the letter-of-credit operations over HTTP and performs each one as
//! a ledger transaction under a wallet identity.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ─────────────▶ http (axum) ─▶ lc::LcService ─▶ ledger::TransactionClient
//!                                                        │
//!                        ┌───────────────────────────────┼──────────────────┐
//!                        ▼                               ▼                  ▼
//!                 profile::ProfileLoader     wallet::IdentityStore   ledger::LedgerGateway
//!                 (connection profile)       (read credential)      (connect/invoke/close)
//!
//!     lc-provision ─▶ enrollment::EnrollmentService ─▶ ca::CaClient ─▶ wallet (put)
//! ```

use lc_gateway::config::load_or_default;
use lc_gateway::lifecycle::{signals, startup, Components, Shutdown};
use lc_gateway::net::tls::load_tls_config;
use lc_gateway::observability::{logging, metrics};
use lc_gateway::wallet::IdentityStore;
use lc_gateway::HttpServer;
use std::net::SocketAddr;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = startup::config_path(None);
    let config = load_or_default(&config_path)?;
    logging::init_tracing(&config.observability.log_level);

    tracing::info!(
        config = %config_path.display(),
        config_found = config_path.exists(),
        bind_address = %config.listener.bind_address,
        organization = %config.ledger.organization,
        identity = %config.ledger.identity,
        channel = %config.ledger.channel,
        contract = %config.ledger.contract,
        "lc-gateway v{} starting",
        env!("CARGO_PKG_VERSION")
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let components = Components::new(&config);
    if !components.store.exists(&config.ledger.identity).await? {
        tracing::warn!(
            identity = %config.ledger.identity,
            "Calling identity is not enrolled; run lc-provision before sending requests"
        );
    }

    let server = HttpServer::new(&config.listener, components.lc_service(&config));
    let shutdown = Shutdown::new();
    signals::spawn_signal_handler(shutdown.clone());

    match &config.listener.tls {
        Some(tls) => {
            let addr: SocketAddr = config.listener.bind_address.parse()?;
            let tls = load_tls_config(tls).await?;
            server.run_tls(addr, tls, shutdown.signalled()).await?;
        }
        None => {
            let listener = TcpListener::bind(&config.listener.bind_address).await?;
            server.run(listener, shutdown.signalled()).await?;
        }
    }

    Ok(())
}
