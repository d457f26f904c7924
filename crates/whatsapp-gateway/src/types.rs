//! Gateway request and response types.

use serde::{Deserialize, Serialize};

/// Delivery receipt returned by the gateway for an outbound send.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendReceipt {
    /// Gateway-assigned message id, if provided.
    #[serde(rename = "messageId")]
    pub message_id: Option<String>,
    /// Delivery status reported at send time, if provided.
    pub status: Option<String>,
}

/// Delivery/read status of a previously sent message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageStatus {
    /// Gateway-assigned message id.
    #[serde(rename = "messageId")]
    pub message_id: String,
    /// Current status (e.g. "SENT", "DELIVERED", "READ").
    pub status: String,
}

/// Error body returned by the gateway on a non-success response.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayErrorBody {
    /// Human-readable error message.
    #[serde(default)]
    pub error: Option<String>,
    /// Alternate message field used by some gateway versions.
    #[serde(default)]
    pub message: Option<String>,
}

impl GatewayErrorBody {
    /// The best available error text.
    pub fn text(&self) -> String {
        self.error
            .clone()
            .or_else(|| self.message.clone())
            .unwrap_or_else(|| "unknown gateway error".to_string())
    }
}
