//! In-memory registry for tests and local runs

use crate::{AssetRegistry, ChainRpc, IssuedSet, RegistryError, Result};
use async_trait::async_trait;
use solbound_tx::programs::mpl_core::CollectionHeader;
use solbound_types::{Hash, IssuedAsset, Pubkey};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Deterministic registry and chain fake
///
/// Holds one collection. Scans and blockhash reads are counted so tests can
/// assert that a request never reached the registry.
#[derive(Clone)]
pub struct InMemoryRegistry {
    collection: Pubkey,
    header: CollectionHeader,
    issued: Arc<RwLock<IssuedSet>>,
    blockhash: Hash,
    offline: Arc<AtomicBool>,
    scans: Arc<AtomicUsize>,
}

impl InMemoryRegistry {
    pub fn new(collection: Pubkey, update_authority: Pubkey) -> Self {
        Self {
            collection,
            header: CollectionHeader {
                update_authority,
                name: "Solbound OG".to_string(),
                uri: String::new(),
                num_minted: 0,
                current_size: 0,
            },
            issued: Arc::new(RwLock::new(IssuedSet::new())),
            blockhash: Hash::new([7; 32]),
            offline: Arc::new(AtomicBool::new(false)),
            scans: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_blockhash(mut self, blockhash: Hash) -> Self {
        self.blockhash = blockhash;
        self
    }

    /// Record an asset as minted to `owner`
    pub async fn mark_issued(&self, public_identity: Pubkey, owner: Pubkey) {
        self.issued.write().await.insert(IssuedAsset {
            public_identity,
            owner,
            collection: self.collection,
        });
    }

    /// Make every subsequent call fail as if the node were unreachable
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of `scan_issued` calls observed
    pub fn scan_count(&self) -> usize {
        self.scans.load(Ordering::SeqCst)
    }

    fn check_online(&self) -> Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(RegistryError::Unavailable {
                message: "connection refused".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl AssetRegistry for InMemoryRegistry {
    async fn scan_issued(&self, collection: &Pubkey) -> Result<IssuedSet> {
        self.scans.fetch_add(1, Ordering::SeqCst);
        self.check_online()?;

        if *collection != self.collection {
            return Ok(IssuedSet::new());
        }
        Ok(self.issued.read().await.clone())
    }
}

#[async_trait]
impl ChainRpc for InMemoryRegistry {
    async fn latest_blockhash(&self) -> Result<Hash> {
        self.check_online()?;
        Ok(self.blockhash)
    }

    async fn fetch_collection(&self, address: &Pubkey) -> Result<CollectionHeader> {
        self.check_online()?;
        if *address != self.collection {
            return Err(RegistryError::CollectionNotFound(*address));
        }

        let minted = self.issued.read().await.len() as u32;
        Ok(CollectionHeader {
            num_minted: minted,
            current_size: minted,
            ..self.header.clone()
        })
    }
}
