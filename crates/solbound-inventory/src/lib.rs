//! Solbound Inventory - Confidential Inventory Store
//!
//! The allocatable items are generated ahead of time and shipped encrypted.
//! At startup the store decrypts them once into an [`Inventory`]: an ordered,
//! immutable list that carries each item's derived public identity next to
//! its secret, so allocation never re-derives keys on the request path.
//!
//! Ordering of the decrypted document is the allocation tie-break and is
//! preserved exactly.

pub mod source;
pub mod store;

pub use source::*;
pub use store::*;

use solbound_crypto::CryptoError;
use solbound_types::Pubkey;
use thiserror::Error;

/// Errors that can occur while loading the inventory
#[derive(Error, Debug)]
pub enum InventoryError {
    #[error("Decryption failed: {message}")]
    Decryption { message: String },

    #[error("Cannot read inventory from {path}: {source}")]
    Source {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Inventory item {index} has unusable key material: {message}")]
    InvalidItem { index: usize, message: String },

    #[error("Inventory items {first} and {second} derive the same identity {identity}")]
    DuplicateIdentity {
        identity: Pubkey,
        first: usize,
        second: usize,
    },

    #[error("Encryption failed: {0}")]
    Encryption(String),
}

impl From<CryptoError> for InventoryError {
    fn from(err: CryptoError) -> Self {
        match err {
            CryptoError::EncryptionFailed(message) => InventoryError::Encryption(message),
            other => InventoryError::Decryption {
                message: other.to_string(),
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, InventoryError>;
