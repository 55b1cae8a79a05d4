//! Mint request errors

use solbound_inventory::InventoryError;
use solbound_registry::RegistryError;
use solbound_storage::StorageError;
use solbound_tx::TxError;
use thiserror::Error;

/// Message returned for every failure without a dedicated one
pub const GENERIC_FAILURE_MESSAGE: &str = "An error occurred";

/// Errors that can occur while serving a mint request
#[derive(Error, Debug)]
pub enum MintError {
    #[error("Invalid requester identity: {input:?}")]
    InvalidRequesterIdentity { input: String },

    #[error("Registry unavailable: {message}")]
    RegistryUnavailable { message: String },

    #[error("Inventory exhausted: all {total} items have been issued")]
    InventoryExhausted { total: usize },

    #[error("Every remaining item is reserved by an in-flight request")]
    InventoryReserved,

    #[error("Upload failed: {message}")]
    UpstreamUploadFailure { message: String },

    #[error("RPC failure: {message}")]
    RpcFailure { message: String },

    #[error("Collection invalid: {message}")]
    CollectionInvalid { message: String },

    #[error("Cannot read asset file {path}: {message}")]
    AssetFileUnreadable { path: String, message: String },

    #[error("Inventory decryption failed: {message}")]
    Decryption { message: String },

    #[error("Assembly failed: {0}")]
    Assembly(#[from] TxError),
}

impl MintError {
    /// Message safe to show the requester
    pub fn public_message(&self) -> &'static str {
        match self {
            MintError::InventoryExhausted { .. } => "All NFTS have been minted",
            MintError::InvalidRequesterIdentity { .. } => "Invalid account provided",
            _ => GENERIC_FAILURE_MESSAGE,
        }
    }

    /// Whether retrying the same request later may succeed
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            MintError::RegistryUnavailable { .. }
                | MintError::UpstreamUploadFailure { .. }
                | MintError::RpcFailure { .. }
                | MintError::InventoryReserved
        )
    }

    /// Stable label for logs
    pub fn kind(&self) -> &'static str {
        match self {
            MintError::InvalidRequesterIdentity { .. } => "invalid_requester_identity",
            MintError::RegistryUnavailable { .. } => "registry_unavailable",
            MintError::InventoryExhausted { .. } => "inventory_exhausted",
            MintError::InventoryReserved => "inventory_reserved",
            MintError::UpstreamUploadFailure { .. } => "upstream_upload_failure",
            MintError::RpcFailure { .. } => "rpc_failure",
            MintError::CollectionInvalid { .. } => "collection_invalid",
            MintError::AssetFileUnreadable { .. } => "asset_file_unreadable",
            MintError::Decryption { .. } => "decryption_error",
            MintError::Assembly(_) => "assembly_error",
        }
    }
}

impl From<StorageError> for MintError {
    fn from(err: StorageError) -> Self {
        MintError::UpstreamUploadFailure {
            message: err.to_string(),
        }
    }
}

impl From<InventoryError> for MintError {
    fn from(err: InventoryError) -> Self {
        MintError::Decryption {
            message: err.to_string(),
        }
    }
}

impl MintError {
    /// Registry errors raised while scanning for issued assets
    pub fn from_scan(err: RegistryError) -> Self {
        MintError::RegistryUnavailable {
            message: err.to_string(),
        }
    }

    /// Registry errors raised while reading the collection or blockhash
    pub fn from_chain(err: RegistryError) -> Self {
        match err {
            RegistryError::CollectionNotFound(_) | RegistryError::CollectionInvalid { .. } => {
                MintError::CollectionInvalid {
                    message: err.to_string(),
                }
            }
            other => MintError::RpcFailure {
                message: other.to_string(),
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, MintError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_messages() {
        assert_eq!(
            MintError::InventoryExhausted { total: 3 }.public_message(),
            "All NFTS have been minted"
        );
        assert_eq!(
            MintError::InvalidRequesterIdentity {
                input: "x".to_string()
            }
            .public_message(),
            "Invalid account provided"
        );
        assert_eq!(MintError::InventoryReserved.public_message(), "An error occurred");
        assert_eq!(
            MintError::from_scan(RegistryError::Unavailable {
                message: "down".to_string()
            })
            .public_message(),
            "An error occurred"
        );
    }

    #[test]
    fn test_chain_error_mapping() {
        let missing = MintError::from_chain(RegistryError::CollectionNotFound(Default::default()));
        assert!(matches!(missing, MintError::CollectionInvalid { .. }));

        let down = MintError::from_chain(RegistryError::Unavailable {
            message: "timeout".to_string(),
        });
        assert!(matches!(down, MintError::RpcFailure { .. }));
        assert!(down.is_transient());
    }
}
