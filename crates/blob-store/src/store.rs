//! The `BlobStore` trait and its implementations.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use crate::config::BlobStoreConfig;
use crate::error::BlobError;

/// A trait for uploading binary blobs and obtaining durable public URLs.
///
/// Object-safe so handlers can hold `Arc<dyn BlobStore>`.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Upload a blob under the given path and return its public URL.
    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, BlobError>;
}

/// Blob store backed by the Record Store's object-storage HTTP API.
pub struct HttpBlobStore {
    http: Client,
    config: BlobStoreConfig,
}

impl HttpBlobStore {
    /// Create a new store for the given configuration.
    pub fn new(config: BlobStoreConfig) -> Result<Self, BlobError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(BlobError::Http)?;

        Ok(Self { http, config })
    }

    /// Create a store from environment variables.
    pub fn from_env() -> Result<Self, BlobError> {
        Self::new(BlobStoreConfig::from_env()?)
    }

    /// The public URL an uploaded path will be served from.
    pub fn public_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{path}",
            self.config.base_url, self.config.bucket
        )
    }
}

#[async_trait]
impl BlobStore for HttpBlobStore {
    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, BlobError> {
        let url = format!(
            "{}/storage/v1/object/{}/{path}",
            self.config.base_url, self.config.bucket
        );

        let resp = self
            .http
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .header("Content-Type", content_type)
            .body(bytes)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            warn!(%status, path, "blob upload rejected");
            return Err(BlobError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        debug!(path, "blob uploaded");
        Ok(self.public_url(path))
    }
}

/// An in-memory store that records uploads and hands out `memory://` URLs.
/// Useful for exercising the pipeline without a Record Store.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    uploads: Mutex<Vec<(String, Vec<u8>)>>,
}

impl MemoryBlobStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Paths uploaded so far, in order.
    pub fn paths(&self) -> Vec<String> {
        self.uploads
            .lock()
            .expect("uploads lock poisoned")
            .iter()
            .map(|(path, _)| path.clone())
            .collect()
    }

    /// The stored bytes for a path, if uploaded.
    pub fn bytes_for(&self, path: &str) -> Option<Vec<u8>> {
        self.uploads
            .lock()
            .expect("uploads lock poisoned")
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, bytes)| bytes.clone())
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        _content_type: &str,
    ) -> Result<String, BlobError> {
        self.uploads
            .lock()
            .expect("uploads lock poisoned")
            .push((path.to_string(), bytes));
        Ok(format!("memory://{path}"))
    }
}
