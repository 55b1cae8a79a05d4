//! HTTP upload service client
//!
//! `POST {endpoint}/upload` with the raw bytes as body and the file's content
//! type; the service answers `{"id": "..."}` and the content is then served at
//! `{gateway}/{id}`.
//!
//! This is the plain upload protocol of a self-hosted or proxied pinning
//! service that pays for storage itself. It does not speak to bundler nodes
//! that require signed data items, so there is no default endpoint.

use crate::{MetadataStorage, Result, StorageError, UploadFile};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the upload service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpStorageConfig {
    /// Base URL of the upload endpoint; required
    pub endpoint: String,
    /// Base URL content is served from; required
    pub gateway: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    60
}

impl Default for HttpStorageConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            gateway: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl HttpStorageConfig {
    /// Name of the first required URL left blank
    pub fn missing_field(&self) -> Option<&'static str> {
        if self.endpoint.trim().is_empty() {
            Some("endpoint")
        } else if self.gateway.trim().is_empty() {
            Some("gateway")
        } else {
            None
        }
    }
}

#[derive(Deserialize)]
struct UploadReceipt {
    id: String,
}

/// Upload service client
pub struct HttpStorage {
    config: HttpStorageConfig,
    client: reqwest::Client,
}

impl HttpStorage {
    pub fn new(config: HttpStorageConfig) -> Result<Self> {
        if let Some(field) = config.missing_field() {
            return Err(StorageError::NotConfigured(field));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| StorageError::Unreachable {
                message: e.to_string(),
            })?;
        Ok(Self { config, client })
    }
}

#[async_trait]
impl MetadataStorage for HttpStorage {
    async fn upload(&self, file: UploadFile) -> Result<String> {
        let url = format!("{}/upload", self.config.endpoint.trim_end_matches('/'));
        let size = file.bytes.len();

        let response = self
            .client
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, &file.content_type)
            .header("x-filename", &file.filename)
            .body(file.bytes)
            .send()
            .await
            .map_err(|e| StorageError::Unreachable {
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(StorageError::UploadFailed {
                message: format!("HTTP {} uploading {}", response.status(), file.filename),
            });
        }

        let receipt: UploadReceipt = response.json().await.map_err(|e| StorageError::InvalidResponse {
            message: e.to_string(),
        })?;
        if receipt.id.is_empty() {
            return Err(StorageError::InvalidResponse {
                message: "empty upload id".to_string(),
            });
        }

        let uri = format!("{}/{}", self.config.gateway.trim_end_matches('/'), receipt.id);
        tracing::info!(filename = %file.filename, size, uri = %uri, "Uploaded file");
        Ok(uri)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AssetMetadata;
    use axum::{http::HeaderMap, http::StatusCode, routing::post, Json, Router};
    use serde_json::{json, Value};
    use std::net::SocketAddr;

    async fn upload_handler(headers: HeaderMap, body: axum::body::Bytes) -> (StatusCode, Json<Value>) {
        let content_type = headers
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();

        if body.is_empty() {
            return (StatusCode::BAD_REQUEST, Json(json!({ "error": "empty" })));
        }
        let id = if content_type == "application/json" { "json-1" } else { "file-1" };
        (StatusCode::OK, Json(json!({ "id": id })))
    }

    async fn spawn_service() -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = Router::new().route("/upload", post(upload_handler));
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    }

    fn storage(addr: SocketAddr) -> HttpStorage {
        HttpStorage::new(HttpStorageConfig {
            endpoint: format!("http://{}", addr),
            gateway: "https://gateway.test/".to_string(),
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_upload_returns_gateway_uri() {
        let storage = storage(spawn_service().await);

        let image = storage
            .upload(UploadFile::new("solbound.png", "image/png", vec![1, 2, 3]))
            .await
            .unwrap();
        assert_eq!(image, "https://gateway.test/file-1");

        let metadata = AssetMetadata {
            name: "OG #1".to_string(),
            description: "Solbound OG Collection".to_string(),
            image,
        };
        assert_eq!(storage.upload_json(&metadata).await.unwrap(), "https://gateway.test/json-1");
    }

    #[test]
    fn test_default_config_has_no_endpoint() {
        let config = HttpStorageConfig::default();
        assert_eq!(config.missing_field(), Some("endpoint"));
        assert!(matches!(
            HttpStorage::new(config),
            Err(StorageError::NotConfigured("endpoint"))
        ));

        let no_gateway = HttpStorageConfig {
            endpoint: "https://uploads.solbound.dev".to_string(),
            ..HttpStorageConfig::default()
        };
        assert!(matches!(
            HttpStorage::new(no_gateway),
            Err(StorageError::NotConfigured("gateway"))
        ));
    }

    #[tokio::test]
    async fn test_rejected_upload() {
        let storage = storage(spawn_service().await);
        let result = storage
            .upload(UploadFile::new("empty.png", "image/png", vec![]))
            .await;
        assert!(matches!(result, Err(StorageError::UploadFailed { .. })));
    }
}
