//! Solbound Registry - what the chain says has already been minted
//!
//! The chain is the source of truth for issuance. This crate exposes two
//! narrow ports over it:
//!
//! - [`AssetRegistry`]: every asset already minted into a collection
//! - [`ChainRpc`]: the collection account and a recent blockhash
//!
//! [`RpcClient`] implements both against a Solana JSON-RPC node;
//! [`InMemoryRegistry`] is the deterministic stand-in used by tests.

pub mod issued;
pub mod memory;
pub mod ports;
pub mod rpc;

pub use issued::*;
pub use memory::*;
pub use ports::*;
pub use rpc::*;

use solbound_types::Pubkey;
use thiserror::Error;

/// Errors that can occur while reading the registry
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Registry unavailable: {message}")]
    Unavailable { message: String },

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("Invalid registry response: {message}")]
    InvalidResponse { message: String },

    #[error("Collection {0} does not exist")]
    CollectionNotFound(Pubkey),

    #[error("Account {address} is not a collection: {message}")]
    CollectionInvalid { address: Pubkey, message: String },
}

pub type Result<T> = std::result::Result<T, RegistryError>;
