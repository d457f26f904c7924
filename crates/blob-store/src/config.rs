//! Configuration for the blob storage client.

use std::env;

use crate::error::BlobError;

/// Default bucket for rendered plan documents.
const DEFAULT_BUCKET: &str = "plans";

/// Default HTTP request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Blob storage configuration.
///
/// Missing credentials are a fatal startup error; uploads never degrade to
/// silent no-ops.
#[derive(Debug, Clone)]
pub struct BlobStoreConfig {
    /// Record Store base URL.
    pub base_url: String,

    /// Service key attached to every call.
    pub api_key: String,

    /// Bucket uploads go to.
    pub bucket: String,

    /// HTTP request timeout in seconds.
    pub timeout_secs: u64,
}

impl BlobStoreConfig {
    /// Create configuration from environment variables.
    ///
    /// Required environment variables:
    /// - `RECORD_STORE_URL` - Record Store base URL
    /// - `RECORD_STORE_KEY` - service key
    ///
    /// Optional environment variables:
    /// - `RECORD_STORE_BUCKET` - bucket name (default: plans)
    /// - `RECORD_STORE_TIMEOUT_SECS` - request timeout (default: 30)
    pub fn from_env() -> Result<Self, BlobError> {
        let base_url = env::var("RECORD_STORE_URL")
            .map_err(|_| BlobError::Config("RECORD_STORE_URL not set".to_string()))?;

        let api_key = env::var("RECORD_STORE_KEY")
            .map_err(|_| BlobError::Config("RECORD_STORE_KEY not set".to_string()))?;

        let bucket =
            env::var("RECORD_STORE_BUCKET").unwrap_or_else(|_| DEFAULT_BUCKET.to_string());

        let timeout_secs = env::var("RECORD_STORE_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Ok(Self {
            base_url,
            api_key,
            bucket,
            timeout_secs,
        })
    }

    /// Create a configuration directly (tests, tooling).
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            bucket: DEFAULT_BUCKET.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}
