//! Registry and chain ports

use crate::{IssuedSet, Result};
use async_trait::async_trait;
use solbound_tx::programs::mpl_core::CollectionHeader;
use solbound_types::{Hash, Pubkey};

/// Read access to assets already minted into a collection
#[async_trait]
pub trait AssetRegistry: Send + Sync {
    /// Every asset whose update authority is `collection`
    async fn scan_issued(&self, collection: &Pubkey) -> Result<IssuedSet>;
}

/// Chain reads the transaction assembler needs
#[async_trait]
pub trait ChainRpc: Send + Sync {
    /// Blockhash to anchor a new transaction to
    async fn latest_blockhash(&self) -> Result<Hash>;

    /// Fetch and decode a collection account
    async fn fetch_collection(&self, address: &Pubkey) -> Result<CollectionHeader>;
}
