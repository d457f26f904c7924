//! Error types for plan authoring.

use thiserror::Error;

/// Errors that can occur while authoring a plan or an answer.
#[derive(Debug, Error)]
pub enum AuthorError {
    /// Invalid or missing configuration.
    #[error("invalid author configuration: {0}")]
    Configuration(String),

    /// The completion request could not reach the provider.
    #[error("network error: {0}")]
    Network(String),

    /// The provider rejected the request or returned an unusable response.
    #[error("completion rejected: {0}")]
    Rejected(String),
}
