//! Solbound Action Server
//!
//! Serves the burn-to-mint action: wallets `GET` the description and `POST`
//! an account to receive a transaction that mints one collectible and burns
//! the configured token amount.
//!
//! # Usage
//!
//! ```bash
//! # Legacy variable names work as-is; the upload service has no default
//! RPC_URL=https://api.mainnet-beta.solana.com SIGNER_PK=... SECRET=... IV_SEED=... \
//!     SOLBOUND__STORAGE__ENDPOINT=https://uploads.example.org \
//!     SOLBOUND__STORAGE__GATEWAY=https://files.example.org \
//!     solbound-action-server
//!
//! # Start with a config file
//! solbound-action-server --config /etc/solbound/server.toml
//!
//! # Override any key from the environment
//! SOLBOUND__SERVER__PORT=8080 SOLBOUND__ISSUER__RESERVATION_TTL_SECS=0 solbound-action-server
//! ```

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::signal;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use solbound_action_server::config::{LoggingConfig, ServerConfig};
use solbound_action_server::{create_router, AppState};
use solbound_crypto::Keypair;
use solbound_inventory::InventoryStore;
use solbound_issuer::MintService;
use solbound_registry::{ChainRpc, RpcClient};
use solbound_storage::HttpStorage;

// =============================================================================
// CLI Arguments
// =============================================================================

/// Solbound Action Server - burn-to-mint transactions over HTTP
#[derive(Parser, Debug)]
#[command(name = "solbound-action-server")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file (TOML, JSON, or YAML)
    #[arg(short, long, env = "SOLBOUND_CONFIG")]
    config: Option<String>,

    /// Host to bind to
    #[arg(long, env = "SOLBOUND_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "SOLBOUND_PORT")]
    port: Option<u16>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "SOLBOUND_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format (json, pretty)
    #[arg(long, env = "SOLBOUND_LOG_FORMAT")]
    log_format: Option<String>,
}

// =============================================================================
// Main Entry Point
// =============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut server_config = ServerConfig::load(args.config.as_deref())?;

    if let Some(host) = args.host {
        server_config.server.host = host;
    }
    if let Some(port) = args.port {
        server_config.server.port = port;
    }
    if let Some(level) = args.log_level {
        server_config.logging.level = level;
    }
    if let Some(format) = args.log_format {
        server_config.logging.format = format;
    }

    init_logging(&server_config.logging)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting Solbound Action Server"
    );

    server_config.validate()?;

    let state = Arc::new(build_state(&server_config).await?);
    let app = create_router(state);

    let addr = server_config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!(
        host = %server_config.server.host,
        port = %server_config.server.port,
        "Server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(server_config.server.shutdown_timeout()))
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}

// =============================================================================
// Initialization Functions
// =============================================================================

/// Initialize tracing/logging
fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.level));

    let subscriber = tracing_subscriber::registry().with(env_filter);

    match config.format.as_str() {
        "json" => {
            subscriber
                .with(fmt::layer().json().with_target(true))
                .try_init()?;
        }
        _ => {
            subscriber
                .with(fmt::layer().pretty().with_target(true))
                .try_init()?;
        }
    }

    Ok(())
}

/// Decrypt the inventory and wire the issuer to its ports
async fn build_state(config: &ServerConfig) -> anyhow::Result<AppState> {
    let source = config.inventory.source();
    tracing::info!(source = %source.describe(), "Loading inventory...");

    let store = InventoryStore::from_secrets(&config.inventory.secret, &config.inventory.iv_seed)?;
    let inventory = store.load(&source)?;
    if inventory.is_empty() {
        tracing::warn!("Inventory is empty; every request will report exhaustion");
    }

    let authority = Arc::new(Keypair::from_base58(&config.signer.secret_key)?);
    tracing::info!(authority = %authority.pubkey(), "Loaded collection authority");

    let rpc = Arc::new(RpcClient::new(config.rpc.clone())?);
    let storage = Arc::new(HttpStorage::new(config.storage.clone())?);

    check_collection(&rpc, config, &authority.pubkey()).await;

    let service = MintService::new(
        config.issuer.clone(),
        inventory,
        authority,
        rpc.clone(),
        rpc,
        storage,
    );

    Ok(AppState::new(
        service,
        config.action.clone(),
        config.server.public_base_url.clone(),
    ))
}

/// Startup check of the collection account; every request checks it again
async fn check_collection(rpc: &RpcClient, config: &ServerConfig, authority: &solbound_types::Pubkey) {
    let collection = config.issuer.collection;
    let lookup = tokio::time::timeout(Duration::from_secs(10), rpc.fetch_collection(&collection)).await;

    match lookup {
        Ok(Ok(header)) if header.update_authority == *authority => {
            tracing::info!(
                %collection,
                name = %header.name,
                size = header.current_size,
                "Collection verified"
            );
        }
        Ok(Ok(header)) => {
            tracing::warn!(
                %collection,
                expected = %authority,
                actual = %header.update_authority,
                "Signer is not the collection update authority; mints rely on an update delegate"
            );
        }
        Ok(Err(e)) => {
            tracing::warn!(%collection, rpc = %rpc.url(), error = %e, "Collection check failed");
        }
        Err(_) => {
            tracing::warn!(%collection, rpc = %rpc.url(), "Collection check timed out");
        }
    }
}

// =============================================================================
// Graceful Shutdown
// =============================================================================

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
///
/// In-flight requests get `drain_timeout` to finish before the process exits.
async fn shutdown_signal(drain_timeout: Duration) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }

    tracing::info!(
        timeout_secs = drain_timeout.as_secs(),
        "Waiting for in-flight requests to complete..."
    );
    tokio::spawn(async move {
        tokio::time::sleep(drain_timeout).await;
        tracing::warn!("Drain timeout elapsed, exiting");
        std::process::exit(1);
    });
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let args = Args::parse_from(["solbound-action-server", "--port", "8080", "--log-format", "json"]);
        assert_eq!(args.port, Some(8080));
        assert_eq!(args.log_format.as_deref(), Some("json"));
        assert!(args.config.is_none());
    }

    #[test]
    fn test_development_config() {
        let config = ServerConfig::development();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.logging.level, "debug");
    }
}
