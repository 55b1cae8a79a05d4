//! Solbound Storage - off-chain asset metadata
//!
//! Each mint publishes two documents before its transaction is compiled: the
//! item's image and a JSON metadata document pointing at it. Uploads are not
//! idempotent and are never retried; a failed upload fails the request.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod http;
pub mod memory;

pub use http::*;
pub use memory::*;

/// Errors that can occur while uploading
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Upload failed: {message}")]
    UploadFailed { message: String },

    #[error("Upload service unreachable: {message}")]
    Unreachable { message: String },

    #[error("Invalid upload response: {message}")]
    InvalidResponse { message: String },

    #[error("Upload service {0} is not configured")]
    NotConfigured(&'static str),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// A file to publish
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(filename: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type.into(),
            bytes,
        }
    }
}

/// Off-chain metadata document, in the shape wallets and explorers read
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetMetadata {
    pub name: String,
    pub description: String,
    pub image: String,
}

/// Content upload service
#[async_trait]
pub trait MetadataStorage: Send + Sync {
    /// Publish a file and return its public URI
    async fn upload(&self, file: UploadFile) -> Result<String>;

    /// Publish a metadata document and return its public URI
    async fn upload_json(&self, metadata: &AssetMetadata) -> Result<String> {
        let bytes = serde_json::to_vec(metadata)?;
        self.upload(UploadFile::new("metadata.json", "application/json", bytes))
            .await
    }
}
