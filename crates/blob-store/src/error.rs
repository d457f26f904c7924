//! Error types for blob storage.

use thiserror::Error;

/// Errors that can occur while uploading a blob.
#[derive(Debug, Error)]
pub enum BlobError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The storage service rejected the upload.
    #[error("upload rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// Invalid or missing configuration.
    #[error("invalid blob store configuration: {0}")]
    Config(String),
}
