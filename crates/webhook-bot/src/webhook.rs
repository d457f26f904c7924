//! Webhook ingress: payload normalization and the HTTP handler.
//!
//! The gateway re-delivers the bot's own outbound sends as inbound webhooks;
//! the `fromMe`/`fromApi` flags mark those and they are dropped before any
//! state is touched, so the bot can never feed itself.

use axum::extract::{Json, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::state::AppState;

/// An inbound webhook payload. The gateway uses two shapes for the sender
/// (`phone` / `from`) and two for the body (`text.message` / `body`);
/// everything else is ignored.
#[derive(Debug, Default, Deserialize)]
pub struct WebhookPayload {
    /// Sender phone number (primary shape).
    pub phone: Option<String>,
    /// Sender phone number (alternate shape).
    pub from: Option<String>,
    /// Message body (primary shape).
    pub text: Option<TextContent>,
    /// Message body (alternate shape).
    pub body: Option<String>,
    /// True when the message was authored by the bot itself.
    #[serde(rename = "fromMe", default)]
    pub from_me: bool,
    /// True when the message was sent through the platform's send API.
    #[serde(rename = "fromApi", default)]
    pub from_api: bool,
}

/// Nested body shape.
#[derive(Debug, Deserialize)]
pub struct TextContent {
    /// The message text.
    pub message: Option<String>,
}

/// The result of normalizing a payload.
#[derive(Debug, PartialEq, Eq)]
pub enum InboundEvent {
    /// One of the bot's own sends echoed back; acknowledge and drop.
    SelfEcho,
    /// No sender could be extracted; reject.
    MissingSender,
    /// A sender but no usable text; acknowledge and drop.
    Blank { phone: String },
    /// A real inbound message.
    Message { phone: String, text: String },
}

/// Normalize an arbitrary gateway payload into an [`InboundEvent`].
pub fn normalize(payload: &WebhookPayload) -> InboundEvent {
    if payload.from_me || payload.from_api {
        return InboundEvent::SelfEcho;
    }

    let phone = payload
        .phone
        .as_deref()
        .or(payload.from.as_deref())
        .map(str::trim)
        .filter(|p| !p.is_empty());
    let phone = match phone {
        Some(phone) => phone.to_string(),
        None => return InboundEvent::MissingSender,
    };

    let text = payload
        .text
        .as_ref()
        .and_then(|t| t.message.as_deref())
        .or(payload.body.as_deref())
        .unwrap_or("");
    if text.trim().is_empty() {
        return InboundEvent::Blank { phone };
    }

    InboundEvent::Message {
        phone,
        text: text.to_string(),
    }
}

/// `POST /webhook`: one inbound event per invocation.
///
/// The acknowledgment is decoupled from how much work was done: handler
/// failures inside the state machine are swallowed there, and only errors
/// that escape resolution itself surface as a 500.
pub async fn receive(
    State(state): State<AppState>,
    Json(payload): Json<WebhookPayload>,
) -> (StatusCode, &'static str) {
    match normalize(&payload) {
        InboundEvent::SelfEcho => {
            debug!("self-echo dropped");
            (StatusCode::OK, "ignored")
        }
        InboundEvent::MissingSender => {
            warn!("webhook payload without sender");
            (StatusCode::BAD_REQUEST, "missing sender")
        }
        InboundEvent::Blank { phone } => {
            debug!(phone, "blank message dropped");
            (StatusCode::OK, "ignored")
        }
        InboundEvent::Message { phone, text } => {
            match state.machine.handle_inbound(&phone, &text).await {
                Ok(()) => (StatusCode::OK, "processed"),
                Err(e) => {
                    error!(phone, error = %e, "inbound handling failed");
                    (StatusCode::INTERNAL_SERVER_ERROR, "internal error")
                }
            }
        }
    }
}

/// Health check endpoint.
#[derive(Serialize)]
pub struct Health {
    pub status: String,
}

/// `GET /health`.
pub async fn health() -> Json<Health> {
    Json(Health {
        status: "ok".to_string(),
    })
}
