//! Decrypted, ordered inventory

use crate::{CiphertextSource, InventoryError, Result};
use solbound_crypto::{derive_public_identity, InventoryCipher};
use solbound_types::{InventoryItem, Pubkey};
use std::collections::HashMap;
use std::sync::Arc;

/// An inventory item with its memoized public identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryEntry {
    pub item: InventoryItem,
    pub public_identity: Pubkey,
}

/// The decrypted inventory, shared read-only across requests
#[derive(Debug, Clone)]
pub struct Inventory {
    entries: Arc<[InventoryEntry]>,
}

impl Inventory {
    /// Derive identities for `items`, keeping their order
    ///
    /// Two items deriving the same identity would make registry records
    /// ambiguous, so they are rejected.
    pub fn from_items(items: Vec<InventoryItem>) -> Result<Self> {
        let mut seen: HashMap<Pubkey, usize> = HashMap::with_capacity(items.len());
        let mut entries = Vec::with_capacity(items.len());

        for (index, item) in items.into_iter().enumerate() {
            let public_identity = derive_public_identity(&item.private_identity).map_err(|e| {
                InventoryError::InvalidItem {
                    index,
                    message: e.to_string(),
                }
            })?;

            if let Some(&first) = seen.get(&public_identity) {
                return Err(InventoryError::DuplicateIdentity {
                    identity: public_identity,
                    first,
                    second: index,
                });
            }
            seen.insert(public_identity, index);

            entries.push(InventoryEntry {
                item,
                public_identity,
            });
        }

        Ok(Self {
            entries: entries.into(),
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in allocation order
    pub fn entries(&self) -> &[InventoryEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &InventoryEntry> {
        self.entries.iter()
    }

    /// Entry whose item derives `identity`
    pub fn find(&self, identity: &Pubkey) -> Option<&InventoryEntry> {
        self.entries.iter().find(|e| e.public_identity == *identity)
    }
}

/// Decrypts and encrypts the stored inventory document
#[derive(Debug, Clone)]
pub struct InventoryStore {
    cipher: InventoryCipher,
}

impl InventoryStore {
    pub fn new(cipher: InventoryCipher) -> Self {
        Self { cipher }
    }

    /// Build the store from the two configured secrets
    pub fn from_secrets(secret: &str, iv_seed: &str) -> Result<Self> {
        Ok(Self::new(InventoryCipher::from_secrets(secret, iv_seed)?))
    }

    /// Read and decrypt the inventory
    pub fn load(&self, source: &CiphertextSource) -> Result<Inventory> {
        let ciphertext = source.read()?;
        let inventory = self.open(&ciphertext)?;
        tracing::info!(
            source = %source.describe(),
            items = inventory.len(),
            "Loaded inventory"
        );
        Ok(inventory)
    }

    /// Decrypt stored ciphertext into an ordered inventory
    pub fn open(&self, ciphertext: &str) -> Result<Inventory> {
        let plaintext = self.cipher.decrypt(ciphertext)?;
        // A wrong key can still unpad cleanly; the document check catches it.
        let items: Vec<InventoryItem> =
            serde_json::from_str(&plaintext).map_err(|e| InventoryError::Decryption {
                message: format!("plaintext is not an inventory document: {}", e),
            })?;
        Inventory::from_items(items)
    }

    /// Encrypt items into the stored format
    pub fn seal(&self, items: &[InventoryItem]) -> Result<String> {
        let plaintext = serde_json::to_string(items).map_err(|e| InventoryError::Encryption(e.to_string()))?;
        Ok(self.cipher.encrypt(&plaintext)?)
    }
}
