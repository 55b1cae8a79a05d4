//! Server Configuration
//!
//! Layered in this order, later sources winning:
//!
//! 1. `config/default`, `config/local` (TOML, JSON or YAML)
//! 2. `--config <file>`
//! 3. `SOLBOUND__SECTION__KEY` environment variables
//! 4. The bare `RPC_URL`, `SIGNER_PK`, `SECRET` and `IV_SEED` variables
//!
//! CLI flags are applied on top by the binary.

use serde::{Deserialize, Serialize};
use solbound_inventory::CiphertextSource;
use solbound_issuer::IssuerConfig;
use solbound_registry::RpcConfig;
use solbound_storage::HttpStorageConfig;
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Bare environment variable names and the keys they override
pub const LEGACY_ENV: [(&str, &str); 4] = [
    ("RPC_URL", "rpc.url"),
    ("SIGNER_PK", "signer.secret_key"),
    ("SECRET", "inventory.secret"),
    ("IV_SEED", "inventory.iv_seed"),
];

/// Server configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: ServerSettings,

    /// Solana JSON-RPC node
    #[serde(default)]
    pub rpc: RpcConfig,

    /// Collection update authority
    #[serde(default)]
    pub signer: SignerSettings,

    /// Where the sealed inventory lives and how to open it
    #[serde(default)]
    pub inventory: InventorySettings,

    /// What is minted and what it costs
    #[serde(default)]
    pub issuer: IssuerConfig,

    /// Metadata upload service
    #[serde(default)]
    pub storage: HttpStorageConfig,

    /// Text shown by wallets rendering the action
    #[serde(default)]
    pub action: ActionSettings,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server binding settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Origin the action icon is resolved against; the request's own origin
    /// when unset
    #[serde(default)]
    pub public_base_url: Option<String>,

    /// Upper bound on draining in-flight requests after a shutdown signal
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout_secs: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            public_base_url: None,
            shutdown_timeout_secs: default_shutdown_timeout(),
        }
    }
}

impl ServerSettings {
    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse()
            .map_err(|e| anyhow::anyhow!("Invalid socket address {}: {}", addr, e))
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }
}

/// Collection authority signer
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct SignerSettings {
    /// Base58 secret key
    #[serde(default)]
    pub secret_key: String,
}

impl fmt::Debug for SignerSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignerSettings")
            .field("secret_key", &redacted(&self.secret_key))
            .finish()
    }
}

/// Sealed inventory location and secrets
#[derive(Clone, Serialize, Deserialize)]
pub struct InventorySettings {
    #[serde(default)]
    pub secret: String,

    #[serde(default)]
    pub iv_seed: String,

    /// File holding the ciphertext
    #[serde(default = "default_inventory_path")]
    pub path: PathBuf,

    /// Ciphertext given directly; takes precedence over `path`
    #[serde(default)]
    pub ciphertext: Option<String>,
}

impl Default for InventorySettings {
    fn default() -> Self {
        Self {
            secret: String::new(),
            iv_seed: String::new(),
            path: default_inventory_path(),
            ciphertext: None,
        }
    }
}

impl InventorySettings {
    pub fn source(&self) -> CiphertextSource {
        match &self.ciphertext {
            Some(inline) if !inline.trim().is_empty() => CiphertextSource::Inline(inline.clone()),
            _ => CiphertextSource::File(self.path.clone()),
        }
    }
}

impl fmt::Debug for InventorySettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InventorySettings")
            .field("secret", &redacted(&self.secret))
            .field("iv_seed", &redacted(&self.iv_seed))
            .field("path", &self.path)
            .field("ciphertext", &self.ciphertext.as_ref().map(|c| c.len()))
            .finish()
    }
}

/// Action metadata returned by `GET`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionSettings {
    #[serde(default = "default_label")]
    pub label: String,

    #[serde(default = "default_title")]
    pub title: String,

    #[serde(default = "default_description")]
    pub description: String,

    /// Icon path, resolved against the public origin
    #[serde(default = "default_icon")]
    pub icon: String,
}

impl Default for ActionSettings {
    fn default() -> Self {
        Self {
            label: default_label(),
            title: default_title(),
            description: default_description(),
            icon: default_icon(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (json, pretty)
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn redacted(value: &str) -> &'static str {
    if value.is_empty() {
        "<unset>"
    } else {
        "<redacted>"
    }
}

// =============================================================================
// Default Functions
// =============================================================================

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_shutdown_timeout() -> u64 {
    30
}

fn default_inventory_path() -> PathBuf {
    PathBuf::from("inventory.enc")
}

fn default_label() -> String {
    "MINT".to_string()
}

fn default_title() -> String {
    "Mint a Solbound.dev OG".to_string()
}

fn default_description() -> String {
    "Burn 200k $BONK to get a Solbound OG collection NFT".to_string()
}

fn default_icon() -> String {
    "/solbound.png".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

// =============================================================================
// Configuration Loading
// =============================================================================

impl ServerConfig {
    /// Load configuration from files and the process environment
    pub fn load(config_path: Option<&str>) -> anyhow::Result<Self> {
        // Load .env file if present
        let _ = dotenvy::dotenv();

        Self::load_with(config_path, |name| std::env::var(name).ok())
    }

    /// Load configuration, reading the bare legacy variables through `lookup`
    pub fn load_with<F>(config_path: Option<&str>, lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false));

        if let Some(path) = config_path {
            builder = builder.add_source(config::File::with_name(path).required(true));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("SOLBOUND")
                .separator("__")
                .try_parsing(true),
        );

        for (name, key) in LEGACY_ENV {
            let value = lookup(name).filter(|v| !v.trim().is_empty());
            builder = builder.set_override_option(key, value)?;
        }

        let config = builder.build()?;
        config
            .try_deserialize()
            .map_err(|e| anyhow::anyhow!("Invalid configuration: {}", e))
    }

    /// Reject configurations the service cannot start with
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.signer.secret_key.trim().is_empty() {
            anyhow::bail!("Signer secret key is not set. Set SIGNER_PK or SOLBOUND__SIGNER__SECRET_KEY.");
        }
        if self.inventory.secret.is_empty() || self.inventory.iv_seed.is_empty() {
            anyhow::bail!("Inventory secrets are not set. Set SECRET and IV_SEED.");
        }
        if self.rpc.url.trim().is_empty() {
            anyhow::bail!("RPC URL is not set. Set RPC_URL or SOLBOUND__RPC__URL.");
        }
        if let Some(field) = self.storage.missing_field() {
            anyhow::bail!(
                "Upload service {} is not set. Set SOLBOUND__STORAGE__{}.",
                field,
                field.to_ascii_uppercase()
            );
        }
        self.server.socket_addr()?;
        Ok(())
    }

    /// Configuration for local development
    pub fn development() -> Self {
        Self {
            rpc: RpcConfig {
                url: "https://api.devnet.solana.com".to_string(),
                ..RpcConfig::default()
            },
            logging: LoggingConfig {
                level: "debug".to_string(),
                format: "pretty".to_string(),
            },
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn no_legacy(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.action.label, "MINT");
        assert_eq!(config.action.icon, "/solbound.png");
        assert_eq!(config.issuer.burn_amount, 1_000_000_000);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_load_file_and_legacy_overrides() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[server]
port = 8088
public_base_url = "https://solbound.dev"

[rpc]
url = "https://rpc.from-file.test"

[inventory]
secret = "file-secret"
iv_seed = "file-seed"
path = "/var/lib/solbound/inventory.enc"

[issuer]
burn_amount = 5

[storage]
endpoint = "https://uploads.solbound.dev"
"#
        )
        .unwrap();

        let legacy: HashMap<&str, &str> = [("RPC_URL", "https://rpc.legacy.test"), ("SIGNER_PK", "signer-key")]
            .into_iter()
            .collect();
        let config = ServerConfig::load_with(file.path().to_str(), |name| {
            legacy.get(name).map(|v| v.to_string())
        })
        .unwrap();

        assert_eq!(config.server.port, 8088);
        assert_eq!(config.server.public_base_url.as_deref(), Some("https://solbound.dev"));
        assert_eq!(config.rpc.url, "https://rpc.legacy.test");
        assert_eq!(config.rpc.commitment, "confirmed");
        assert_eq!(config.signer.secret_key, "signer-key");
        assert_eq!(config.inventory.secret, "file-secret");
        assert_eq!(config.issuer.burn_amount, 5);
        assert_eq!(config.issuer.burn_decimals, 9);
        assert_eq!(config.storage.endpoint, "https://uploads.solbound.dev");
        assert_eq!(config.storage.missing_field(), Some("gateway"));
        assert!(matches!(
            config.inventory.source(),
            CiphertextSource::File(path) if path == PathBuf::from("/var/lib/solbound/inventory.enc")
        ));
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let result = ServerConfig::load_with(Some("/nonexistent/solbound-server.toml"), no_legacy);
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_requires_secrets() {
        let mut config = ServerConfig::development();
        assert!(config.validate().is_err());

        config.signer.secret_key = "key".to_string();
        assert!(config.validate().is_err());

        config.inventory.secret = "secret".to_string();
        config.inventory.iv_seed = "seed".to_string();
        assert!(config.validate().is_err());

        config.storage.endpoint = "https://uploads.solbound.dev".to_string();
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("SOLBOUND__STORAGE__GATEWAY"));

        config.storage.gateway = "https://files.solbound.dev".to_string();
        assert!(config.validate().is_ok());

        config.server.host = "not a host".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_inline_ciphertext_wins() {
        let settings = InventorySettings {
            ciphertext: Some("abcd".to_string()),
            ..InventorySettings::default()
        };
        assert!(matches!(settings.source(), CiphertextSource::Inline(c) if c == "abcd"));

        let blank = InventorySettings {
            ciphertext: Some("  ".to_string()),
            ..InventorySettings::default()
        };
        assert!(matches!(blank.source(), CiphertextSource::File(_)));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let mut config = ServerConfig::default();
        config.signer.secret_key = "4wBqpZM9xaSheZzJSMawUKKwhdpChKbZ5eu5ky4Vigw".to_string();
        config.inventory.secret = "hunter2".to_string();

        let printed = format!("{:?}", config);
        assert!(!printed.contains("4wBqpZM9"));
        assert!(!printed.contains("hunter2"));
        assert!(printed.contains("<redacted>"));
    }
}
