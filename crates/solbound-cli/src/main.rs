//! Solbound CLI - operator tooling for the burn-to-mint service
//!
//! # Quick Start
//!
//! ```bash
//! # Seal a plaintext inventory (secrets from SECRET / IV_SEED)
//! solbound encrypt inventory.json -o inventory.enc
//!
//! # List items and the asset addresses they mint into
//! solbound inspect inventory.enc
//!
//! # How much is left?
//! solbound status inventory.enc --rpc-url https://api.devnet.solana.com
//! ```

use clap::{Args, Parser, Subcommand};
use solbound_inventory::{CiphertextSource, InventoryStore};
use solbound_issuer::IssuerConfig;
use solbound_registry::{RpcClient, RpcConfig};
use solbound_types::parse_address;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod display;

use commands::{chain, inventory};

/// Solbound CLI - inventory and issuance tooling
#[derive(Parser)]
#[command(name = "solbound")]
#[command(author = "Solbound Contributors")]
#[command(version)]
#[command(about = "Operator tooling for the Solbound burn-to-mint service", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct CipherArgs {
    /// Inventory encryption secret
    #[arg(long, env = "SECRET", hide_env_values = true)]
    secret: String,

    /// Inventory IV seed
    #[arg(long, env = "IV_SEED", hide_env_values = true)]
    iv_seed: String,
}

impl CipherArgs {
    fn store(&self) -> anyhow::Result<InventoryStore> {
        Ok(InventoryStore::from_secrets(&self.secret, &self.iv_seed)?)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Encrypt a plaintext inventory document
    Encrypt {
        /// Plaintext JSON array of items
        input: PathBuf,

        /// Write the sealed inventory here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        cipher: CipherArgs,
    },

    /// Decrypt and list the inventory
    Inspect {
        /// Sealed inventory file
        inventory: PathBuf,

        /// Print JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        cipher: CipherArgs,
    },

    /// Report issued and remaining items
    Status {
        /// Sealed inventory file
        inventory: PathBuf,

        /// Solana JSON-RPC endpoint
        #[arg(long, env = "RPC_URL", default_value = "https://api.mainnet-beta.solana.com")]
        rpc_url: String,

        /// Collection address (defaults to the configured offer)
        #[arg(long)]
        collection: Option<String>,

        /// List every item
        #[arg(short, long)]
        verbose: bool,

        #[command(flatten)]
        cipher: CipherArgs,
    },

    /// Print the associated token account for an owner and mint
    DeriveAta {
        owner: String,

        /// Token mint (defaults to the configured burn token)
        #[arg(long)]
        mint: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let defaults = IssuerConfig::default();

    match cli.command {
        Commands::Encrypt { input, output, cipher } => {
            inventory::encrypt(&cipher.store()?, &input, output.as_deref())?;
        }
        Commands::Inspect { inventory: path, json, cipher } => {
            inventory::inspect(&cipher.store()?, &CiphertextSource::File(path), json)?;
        }
        Commands::Status {
            inventory: path,
            rpc_url,
            collection,
            verbose,
            cipher,
        } => {
            let items = cipher.store()?.load(&CiphertextSource::File(path))?;
            let collection = match collection {
                Some(address) => parse_address(&address)?,
                None => defaults.collection,
            };
            tracing::debug!(%collection, items = items.len(), rpc = %rpc_url, "Checking issuance status");
            let rpc = RpcClient::new(RpcConfig {
                url: rpc_url,
                ..RpcConfig::default()
            })?;
            chain::status(&items, &rpc, &collection, verbose).await?;
        }
        Commands::DeriveAta { owner, mint } => {
            let mint = mint.unwrap_or_else(|| defaults.fungible_mint.to_string());
            chain::derive_ata(&owner, &mint)?;
        }
    }

    Ok(())
}
