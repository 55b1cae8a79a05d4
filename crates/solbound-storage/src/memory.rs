//! In-memory upload service

use crate::{MetadataStorage, Result, StorageError, UploadFile};
use async_trait::async_trait;
use solbound_crypto::sha256;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Content-addressed fake that records every upload
#[derive(Clone, Default)]
pub struct MemoryStorage {
    uploads: Arc<RwLock<Vec<UploadFile>>>,
    failing: Arc<AtomicBool>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent upload fail
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Uploads received so far, in order
    pub async fn uploads(&self) -> Vec<UploadFile> {
        self.uploads.read().await.clone()
    }

    pub fn uri_for(bytes: &[u8]) -> String {
        format!("memory://{}", hex::encode(sha256(bytes)))
    }
}

#[async_trait]
impl MetadataStorage for MemoryStorage {
    async fn upload(&self, file: UploadFile) -> Result<String> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StorageError::UploadFailed {
                message: format!("rejected {}", file.filename),
            });
        }

        let uri = Self::uri_for(&file.bytes);
        self.uploads.write().await.push(file);
        Ok(uri)
    }
}
