//! Mint request orchestration
//!
//! Per request, strictly in order:
//!
//! ```text
//! validate requester ─▶ scan registry ─▶ allocate + lease ─▶ check collection
//!   ─▶ upload image ─▶ upload metadata ─▶ blockhash ─▶ assemble + sign
//! ```
//!
//! The requester is validated before anything touches the network. Nothing is
//! retried and nothing is broadcast.

use crate::allocator::allocate_reserved;
use crate::assembler::{assemble, parse_requester, requester_excerpt, AssemblyInput, FeeParams};
use crate::reservation::ReservationLedger;
use crate::{IssuerConfig, MintError, Result};
use serde::{Deserialize, Serialize};
use solbound_crypto::{Keypair, TxSigner};
use solbound_inventory::{Inventory, InventoryEntry};
use solbound_registry::{AssetRegistry, ChainRpc};
use solbound_storage::{AssetMetadata, MetadataStorage, UploadFile};
use solbound_types::Pubkey;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// A transaction ready for the requester to sign
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MintOutcome {
    /// Base64 wire transaction
    pub transaction: String,
    pub requester: Pubkey,
    pub asset: Pubkey,
    pub item_name: String,
    pub category: String,
}

/// Issued versus remaining inventory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryStatus {
    pub total: usize,
    pub issued: usize,
    pub remaining: usize,
    pub reserved: usize,
    /// Issued assets that no inventory item derives
    pub unknown: usize,
}

/// The burn-to-mint issuer
pub struct MintService {
    config: IssuerConfig,
    fees: FeeParams,
    inventory: Inventory,
    authority: Arc<dyn TxSigner>,
    registry: Arc<dyn AssetRegistry>,
    chain: Arc<dyn ChainRpc>,
    storage: Arc<dyn MetadataStorage>,
    reservations: ReservationLedger,
}

impl MintService {
    pub fn new(
        config: IssuerConfig,
        inventory: Inventory,
        authority: Arc<dyn TxSigner>,
        registry: Arc<dyn AssetRegistry>,
        chain: Arc<dyn ChainRpc>,
        storage: Arc<dyn MetadataStorage>,
    ) -> Self {
        let fees = FeeParams {
            fungible_mint: config.fungible_mint,
            burn_amount: config.burn_amount,
            burn_decimals: config.burn_decimals,
            compute_unit_price: config.compute_unit_price,
        };
        let reservations = ReservationLedger::new(Duration::from_secs(config.reservation_ttl_secs));

        Self {
            config,
            fees,
            inventory,
            authority,
            registry,
            chain,
            storage,
            reservations,
        }
    }

    pub fn config(&self) -> &IssuerConfig {
        &self.config
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn authority(&self) -> Pubkey {
        self.authority.pubkey()
    }

    /// Build a mint transaction for `account`
    pub async fn mint(&self, account: &str) -> Result<MintOutcome> {
        let request_id = Uuid::new_v4();
        match self.mint_inner(account).await {
            Ok(outcome) => {
                tracing::info!(
                    %request_id,
                    requester = %outcome.requester,
                    asset = %outcome.asset,
                    item = %outcome.item_name,
                    "Mint transaction ready"
                );
                Ok(outcome)
            }
            Err(err) => {
                tracing::warn!(
                    %request_id,
                    requester = %requester_excerpt(account),
                    kind = err.kind(),
                    transient = err.is_transient(),
                    error = %err,
                    "Mint request failed"
                );
                Err(err)
            }
        }
    }

    async fn mint_inner(&self, account: &str) -> Result<MintOutcome> {
        let requester = parse_requester(account)?;

        let issued = self
            .registry
            .scan_issued(&self.config.collection)
            .await
            .map_err(MintError::from_scan)?;

        let (entry, reservation) = allocate_reserved(&self.inventory, &issued, &self.reservations)?;
        tracing::debug!(
            asset = %entry.public_identity,
            item = %entry.item.display_name,
            issued = issued.len(),
            "Allocated item"
        );

        // Any error from here on drops the reservation.
        self.check_collection().await?;
        let metadata_uri = self.publish_metadata(entry).await?;

        let recent_blockhash = self
            .chain
            .latest_blockhash()
            .await
            .map_err(MintError::from_chain)?;

        let item_signer = Keypair::from_secret(&entry.item.private_identity).map_err(|e| {
            MintError::Decryption {
                message: e.to_string(),
            }
        })?;

        let envelope = assemble(&AssemblyInput {
            item: &entry.item,
            requester,
            metadata_uri: &metadata_uri,
            collection: self.config.collection,
            category_attribute: &self.config.category_attribute,
            authority: self.authority.as_ref(),
            item_signer: &item_signer,
            fees: &self.fees,
            recent_blockhash,
        })?;
        let transaction = envelope.to_base64()?;

        reservation.keep();

        Ok(MintOutcome {
            transaction,
            requester,
            asset: envelope.asset,
            item_name: entry.item.display_name.clone(),
            category: entry.item.category.clone(),
        })
    }

    /// The collection must exist and be a Core collection
    ///
    /// A signer that is not the update authority may still hold an update
    /// delegate, which only the on-chain program resolves, so a mismatch is
    /// logged rather than rejected.
    async fn check_collection(&self) -> Result<()> {
        let header = self
            .chain
            .fetch_collection(&self.config.collection)
            .await
            .map_err(MintError::from_chain)?;

        if header.update_authority != self.authority.pubkey() {
            tracing::warn!(
                collection = %self.config.collection,
                update_authority = %header.update_authority,
                signer = %self.authority.pubkey(),
                "Signer is not the collection update authority; relying on an update delegate"
            );
        }
        Ok(())
    }

    /// Upload the item's image, then its metadata document
    async fn publish_metadata(&self, entry: &InventoryEntry) -> Result<String> {
        let path = self.config.asset_dir.join(&entry.item.image_ref);
        let image = tokio::fs::read(&path)
            .await
            .map_err(|e| MintError::AssetFileUnreadable {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        let image_uri = self
            .storage
            .upload(UploadFile::new(
                self.config.image_filename.clone(),
                self.config.image_content_type.clone(),
                image,
            ))
            .await?;

        let metadata_uri = self
            .storage
            .upload_json(&AssetMetadata {
                name: entry.item.display_name.clone(),
                description: self.config.metadata_description.clone(),
                image: image_uri,
            })
            .await?;

        Ok(metadata_uri)
    }

    /// Compare the inventory with the registry
    pub async fn status(&self) -> Result<InventoryStatus> {
        let issued = self
            .registry
            .scan_issued(&self.config.collection)
            .await
            .map_err(MintError::from_scan)?;

        let issued_items = self
            .inventory
            .iter()
            .filter(|e| issued.contains(&e.public_identity))
            .count();
        let unknown = issued
            .iter()
            .filter(|asset| self.inventory.find(&asset.public_identity).is_none())
            .count();
        if unknown > 0 {
            tracing::warn!(unknown, "Registry reports assets that no inventory item derives");
        }

        Ok(InventoryStatus {
            total: self.inventory.len(),
            issued: issued_items,
            remaining: self.inventory.len() - issued_items,
            reserved: self.reservations.purge_expired(),
            unknown,
        })
    }
}
