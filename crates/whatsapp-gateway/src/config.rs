//! Configuration for the gateway client.

use std::env;

use crate::error::GatewayError;

/// Default HTTP request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Gateway client configuration.
///
/// The gateway authenticates every call with a static bearer token; running
/// without one is a configuration error, not a degraded mode.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Gateway base URL.
    pub base_url: String,

    /// Static bearer token attached to every call.
    pub api_token: String,

    /// HTTP request timeout in seconds.
    pub timeout_secs: u64,
}

impl GatewayConfig {
    /// Create configuration from environment variables.
    ///
    /// Required environment variables:
    /// - `GATEWAY_BASE_URL` - gateway base URL
    /// - `GATEWAY_API_TOKEN` - bearer token
    ///
    /// Optional environment variables:
    /// - `GATEWAY_TIMEOUT_SECS` - request timeout (default: 30)
    pub fn from_env() -> Result<Self, GatewayError> {
        let base_url = env::var("GATEWAY_BASE_URL")
            .map_err(|_| GatewayError::Config("GATEWAY_BASE_URL not set".to_string()))?;

        let api_token = env::var("GATEWAY_API_TOKEN")
            .map_err(|_| GatewayError::Config("GATEWAY_API_TOKEN not set".to_string()))?;

        let timeout_secs = env::var("GATEWAY_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Ok(Self {
            base_url,
            api_token,
            timeout_secs,
        })
    }

    /// Create a configuration for a base URL and token (tests, tooling).
    pub fn new(base_url: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_token: api_token.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}
