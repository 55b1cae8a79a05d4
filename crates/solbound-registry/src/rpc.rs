//! Solana JSON-RPC client

use crate::{AssetRegistry, ChainRpc, IssuedSet, RegistryError, Result};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use solbound_tx::programs::mpl_core::{
    AssetHeader, CollectionHeader, Key, UpdateAuthority, ASSET_UPDATE_AUTHORITY_OFFSET,
};
use solbound_types::{Hash, IssuedAsset, Pubkey, MPL_CORE_PROGRAM_ID};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Configuration for the RPC client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RpcConfig {
    pub url: String,
    /// Commitment level for every read
    #[serde(default = "default_commitment")]
    pub commitment: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_commitment() -> String {
    "confirmed".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            url: "https://api.mainnet-beta.solana.com".to_string(),
            commitment: default_commitment(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// JSON-RPC client for a Solana node
pub struct RpcClient {
    config: RpcConfig,
    client: reqwest::Client,
    next_id: AtomicU64,
}

#[derive(Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

#[derive(Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcErrorObject>,
}

#[derive(Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

#[derive(Deserialize)]
struct WithContext<T> {
    value: T,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BlockhashValue {
    blockhash: String,
}

#[derive(Deserialize)]
struct UiAccount {
    /// `[payload, encoding]`
    data: (String, String),
    owner: String,
}

#[derive(Deserialize)]
struct KeyedAccount {
    pubkey: String,
    account: UiAccount,
}

impl UiAccount {
    fn decode_data(&self) -> Result<Vec<u8>> {
        if self.data.1 != "base64" {
            return Err(RegistryError::InvalidResponse {
                message: format!("unexpected account encoding {}", self.data.1),
            });
        }
        STANDARD
            .decode(&self.data.0)
            .map_err(|e| RegistryError::InvalidResponse {
                message: format!("account data: {}", e),
            })
    }
}

fn parse_pubkey(field: &str, value: &str) -> Result<Pubkey> {
    value.parse().map_err(|_| RegistryError::InvalidResponse {
        message: format!("{} is not an address: {}", field, value),
    })
}

impl RpcClient {
    pub fn new(config: RpcConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| RegistryError::Unavailable {
                message: e.to_string(),
            })?;

        Ok(Self {
            config,
            client,
            next_id: AtomicU64::new(1),
        })
    }

    pub fn url(&self) -> &str {
        &self.config.url
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T> {
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };

        tracing::debug!(method, url = %self.config.url, "RPC request");

        let response = self
            .client
            .post(&self.config.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| RegistryError::Unavailable {
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(RegistryError::Unavailable {
                message: format!("HTTP {} from {}", response.status(), method),
            });
        }

        let body: RpcResponse<T> = response.json().await.map_err(|e| RegistryError::InvalidResponse {
            message: format!("{}: {}", method, e),
        })?;

        if let Some(err) = body.error {
            return Err(RegistryError::Rpc {
                code: err.code,
                message: err.message,
            });
        }

        body.result.ok_or_else(|| RegistryError::InvalidResponse {
            message: format!("{}: missing result", method),
        })
    }

    /// Decode one `getProgramAccounts` entry and re-apply the query filters
    fn issued_from_account(collection: &Pubkey, keyed: &KeyedAccount) -> Result<Option<IssuedAsset>> {
        let public_identity = parse_pubkey("pubkey", &keyed.pubkey)?;
        let data = keyed.account.decode_data()?;

        if data.first().copied() != Some(Key::AssetV1 as u8) {
            return Ok(None);
        }

        let header = AssetHeader::decode(&data).map_err(|e| RegistryError::InvalidResponse {
            message: format!("asset {}: {}", public_identity, e),
        })?;

        if header.update_authority != UpdateAuthority::Collection(*collection) {
            return Ok(None);
        }

        Ok(Some(IssuedAsset {
            public_identity,
            owner: header.owner,
            collection: *collection,
        }))
    }
}

#[async_trait]
impl AssetRegistry for RpcClient {
    async fn scan_issued(&self, collection: &Pubkey) -> Result<IssuedSet> {
        let authority_filter = UpdateAuthority::Collection(*collection).to_bytes();
        let params = json!([
            MPL_CORE_PROGRAM_ID.to_string(),
            {
                "encoding": "base64",
                "commitment": self.config.commitment,
                "filters": [
                    { "memcmp": { "offset": 0, "bytes": bs58::encode([Key::AssetV1 as u8]).into_string() } },
                    { "memcmp": { "offset": ASSET_UPDATE_AUTHORITY_OFFSET, "bytes": bs58::encode(authority_filter).into_string() } },
                ],
            }
        ]);

        let accounts: Vec<KeyedAccount> = self.call("getProgramAccounts", params).await?;
        let returned = accounts.len();

        let mut issued = IssuedSet::new();
        for keyed in &accounts {
            match Self::issued_from_account(collection, keyed)? {
                Some(asset) => issued.insert(asset),
                None => tracing::warn!(account = %keyed.pubkey, "Dropping account that does not match scan filters"),
            }
        }

        tracing::debug!(
            collection = %collection,
            returned,
            issued = issued.len(),
            "Scanned registry"
        );
        Ok(issued)
    }
}

#[async_trait]
impl ChainRpc for RpcClient {
    async fn latest_blockhash(&self) -> Result<Hash> {
        let params = json!([{ "commitment": self.config.commitment }]);
        let response: WithContext<BlockhashValue> = self.call("getLatestBlockhash", params).await?;
        response
            .value
            .blockhash
            .parse()
            .map_err(|_| RegistryError::InvalidResponse {
                message: format!("blockhash {}", response.value.blockhash),
            })
    }

    async fn fetch_collection(&self, address: &Pubkey) -> Result<CollectionHeader> {
        let params = json!([
            address.to_string(),
            { "encoding": "base64", "commitment": self.config.commitment }
        ]);
        let response: WithContext<Option<UiAccount>> = self.call("getAccountInfo", params).await?;
        let account = response.value.ok_or(RegistryError::CollectionNotFound(*address))?;

        let owner = parse_pubkey("owner", &account.owner)?;
        if owner != MPL_CORE_PROGRAM_ID {
            return Err(RegistryError::CollectionInvalid {
                address: *address,
                message: format!("owned by {}", owner),
            });
        }

        let data = account.decode_data()?;
        CollectionHeader::decode(&data).map_err(|e| RegistryError::CollectionInvalid {
            address: *address,
            message: e.to_string(),
        })
    }
}
