//! Configuration loaded from environment variables.

use std::env;
use std::net::SocketAddr;

/// Webhook bot configuration.
///
/// The gateway, plan author, and blob store load their own credentials; see
/// their crates. Missing credentials in any of them abort startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address.
    pub addr: SocketAddr,
    /// SQLite database URL.
    pub database_url: String,
    /// Payment link included in the payment request message, if configured.
    pub payment_link: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `BOT_ADDR` | Server bind address | `127.0.0.1:8789` |
    /// | `SQLITE_PATH` | SQLite database URL | `sqlite:bot.db?mode=rwc` |
    /// | `PAYMENT_LINK` | Payment link for the payment request | (none) |
    pub fn from_env() -> Result<Self, ConfigError> {
        let addr = env::var("BOT_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8789".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidAddr)?;

        let database_url =
            env::var("SQLITE_PATH").unwrap_or_else(|_| "sqlite:bot.db?mode=rwc".to_string());

        let payment_link = env::var("PAYMENT_LINK").ok().filter(|v| !v.trim().is_empty());

        Ok(Self {
            addr,
            database_url,
            payment_link,
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid BOT_ADDR format")]
    InvalidAddr,
}
