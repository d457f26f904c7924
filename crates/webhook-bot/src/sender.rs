//! Message sender trait and implementations.

use async_trait::async_trait;
use whatsapp_gateway::WhatsAppClient;

use crate::error::BotError;

/// Trait for sending messages back to a client.
///
/// Abstracted to support different transports (the WhatsApp gateway, tests).
#[async_trait]
pub trait MessageSender: Send + Sync {
    /// Send a text message.
    async fn send_text(&self, phone: &str, text: &str) -> Result<(), BotError>;

    /// Set the typing indicator. Cosmetic; implementations must not fail.
    async fn send_typing(&self, phone: &str, is_typing: bool);
}

#[async_trait]
impl MessageSender for WhatsAppClient {
    async fn send_text(&self, phone: &str, text: &str) -> Result<(), BotError> {
        WhatsAppClient::send_text(self, phone, text).await?;
        Ok(())
    }

    async fn send_typing(&self, phone: &str, is_typing: bool) {
        WhatsAppClient::send_typing(self, phone, is_typing).await;
    }
}

/// A sender that records every message instead of delivering it.
/// Useful for exercising the state machine without a gateway.
#[derive(Debug, Default)]
pub struct RecordingSender {
    sent: std::sync::Mutex<Vec<(String, String)>>,
}

impl RecordingSender {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// All `(phone, text)` pairs sent so far, in order.
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().expect("sent lock poisoned").clone()
    }

    /// The texts sent so far, in order.
    pub fn texts(&self) -> Vec<String> {
        self.sent().into_iter().map(|(_, text)| text).collect()
    }
}

#[async_trait]
impl MessageSender for RecordingSender {
    async fn send_text(&self, phone: &str, text: &str) -> Result<(), BotError> {
        self.sent
            .lock()
            .expect("sent lock poisoned")
            .push((phone.to_string(), text.to_string()));
        Ok(())
    }

    async fn send_typing(&self, _phone: &str, _is_typing: bool) {}
}
