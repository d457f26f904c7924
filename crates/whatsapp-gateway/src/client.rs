//! HTTP client for the WhatsApp messaging gateway.
//!
//! All chat I/O goes through this client. Every call carries the static
//! bearer token from [`GatewayConfig`].

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, warn};

use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::types::{GatewayErrorBody, MessageStatus, SendReceipt};

/// HTTP connect timeout for the reqwest client.
const CONNECT_TIMEOUT_SECS: u64 = 5;

/// Client for the WhatsApp gateway HTTP API.
#[derive(Clone)]
pub struct WhatsAppClient {
    http: Client,
    config: GatewayConfig,
}

impl WhatsAppClient {
    /// Create a new client for the given configuration.
    pub fn new(config: GatewayConfig) -> Result<Self, GatewayError> {
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(GatewayError::Http)?;

        Ok(Self { http, config })
    }

    /// The configured gateway base URL.
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Send a text message.
    pub async fn send_text(&self, phone: &str, message: &str) -> Result<SendReceipt, GatewayError> {
        let body = json!({ "phone": phone, "message": message });
        let receipt = self.post("send-text", &body).await?;
        debug!(phone, "text sent via gateway");
        Ok(receipt)
    }

    /// Send an image by URL, with an optional caption.
    pub async fn send_image(
        &self,
        phone: &str,
        image_url: &str,
        caption: Option<&str>,
    ) -> Result<SendReceipt, GatewayError> {
        let body = json!({ "phone": phone, "image": image_url, "caption": caption });
        self.post("send-image", &body).await
    }

    /// Send a document by URL, with an optional file name.
    pub async fn send_document(
        &self,
        phone: &str,
        document_url: &str,
        file_name: Option<&str>,
    ) -> Result<SendReceipt, GatewayError> {
        let body = json!({ "phone": phone, "document": document_url, "fileName": file_name });
        let receipt = self.post("send-document", &body).await?;
        debug!(phone, document_url, "document sent via gateway");
        Ok(receipt)
    }

    /// Send an audio clip by URL.
    pub async fn send_audio(&self, phone: &str, audio_url: &str) -> Result<SendReceipt, GatewayError> {
        let body = json!({ "phone": phone, "audio": audio_url });
        self.post("send-audio", &body).await
    }

    /// Set the typing indicator for a chat.
    ///
    /// Fire-and-forget: typing indicators are cosmetic and must never block
    /// message delivery, so transport errors are logged and discarded.
    pub async fn send_typing(&self, phone: &str, is_typing: bool) {
        let url = format!("{}/send-typing", self.config.base_url);
        let body = json!({ "phone": phone, "value": is_typing });
        let result = self
            .http
            .post(&url)
            .bearer_auth(&self.config.api_token)
            .json(&body)
            .send()
            .await;
        if let Err(e) = result {
            warn!(phone, error = %e, "failed to send typing indicator");
        }
    }

    /// Get the delivery/read status of a sent message.
    pub async fn message_status(&self, message_id: &str) -> Result<MessageStatus, GatewayError> {
        let url = format!("{}/message-status/{message_id}", self.config.base_url);
        let resp = self
            .http
            .get(&url)
            .bearer_auth(&self.config.api_token)
            .send()
            .await?;

        Self::parse_response(resp).await
    }

    /// Mark an inbound message as read.
    pub async fn mark_read(&self, message_id: &str) -> Result<(), GatewayError> {
        let body = json!({ "messageId": message_id });
        let _: serde_json::Value = self.post("read-message", &body).await?;
        Ok(())
    }

    async fn post<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &serde_json::Value,
    ) -> Result<T, GatewayError> {
        let url = format!("{}/{endpoint}", self.config.base_url);
        let resp = self
            .http
            .post(&url)
            .bearer_auth(&self.config.api_token)
            .json(body)
            .send()
            .await?;

        Self::parse_response(resp).await
    }

    async fn parse_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, GatewayError> {
        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<GatewayErrorBody>(&text)
                .map(|body| body.text())
                .unwrap_or(text);
            warn!(%status, message, "gateway call failed");
            return Err(GatewayError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(resp.json().await?)
    }
}
