//! Error types for the gateway client.

use thiserror::Error;

/// Errors that can occur when talking to the messaging gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The gateway rejected the call.
    #[error("gateway rejected call ({status}): {message}")]
    Api { status: u16, message: String },

    /// Invalid or missing configuration.
    #[error("invalid gateway configuration: {0}")]
    Config(String),
}
