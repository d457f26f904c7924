//! WhatsApp messaging gateway client.
//!
//! This crate wraps the gateway's HTTP API behind a typed client: outbound
//! text/image/document/audio sends, typing indicators, message status, and
//! read receipts. Authentication is a static bearer token attached to every
//! call; missing credentials are a fatal configuration error at startup.
//!
//! # Example
//!
//! ```no_run
//! use whatsapp_gateway::{GatewayConfig, WhatsAppClient};
//!
//! # async fn example() -> Result<(), whatsapp_gateway::GatewayError> {
//! let client = WhatsAppClient::new(GatewayConfig::from_env()?)?;
//! client.send_text("351911111111", "Olá!").await?;
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod error;
mod types;

pub use client::WhatsAppClient;
pub use config::GatewayConfig;
pub use error::GatewayError;
pub use types::{MessageStatus, SendReceipt};
