//! Database models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A client, identified by their WhatsApp phone number.
///
/// Created lazily on the first inbound message from an unseen number and
/// never deleted by the bot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Client {
    /// Row id (UUID v4, minted on first contact).
    pub id: String,
    /// Phone number; the unique natural key.
    pub phone: String,
    /// Display name.
    pub name: Option<String>,
    /// Age, free text.
    pub age: Option<String>,
    /// Gender.
    pub gender: Option<String>,
    /// Height, free text.
    pub height: Option<String>,
    /// Weight, free text.
    pub weight: Option<String>,
    /// Training goal.
    pub goal: Option<String>,
    /// Training experience.
    pub experience: Option<String>,
    /// Days available per week.
    pub available_days: Option<String>,
    /// Health conditions.
    pub health_conditions: Option<String>,
    /// Exercise preferences.
    pub exercise_preferences: Option<String>,
    /// Dietary restrictions.
    pub dietary_restrictions: Option<String>,
    /// Available equipment.
    pub equipment: Option<String>,
    /// Motivation.
    pub motivation: Option<String>,
    /// Whether payment has been confirmed.
    pub paid: bool,
    /// Public URL of the rendered plan document, once generated.
    pub plan_url: Option<String>,
    /// Latest generated plan text.
    pub plan_text: Option<String>,
    /// Whether the bot responds to this client at all.
    pub ai_enabled: bool,
    /// Creation timestamp.
    pub created_at: String,
    /// Last update timestamp.
    pub updated_at: String,
}

/// One intake/fulfillment cycle for a client.
///
/// The most recently created row is the active conversation; the bot only
/// ever advances `state`, it never closes or archives a row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Conversation {
    /// Row id (UUID v4).
    pub id: String,
    /// Owning client id.
    pub client_id: String,
    /// Conversation state, as TEXT (see `intake_core::ConversationState`).
    pub state: String,
    /// Profile draft in progress, as JSON.
    pub context: String,
    /// Creation timestamp.
    pub created_at: String,
    /// Last update timestamp.
    pub updated_at: String,
}

/// An append-only log entry of one exchanged message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ChatMessage {
    /// Auto-incrementing id.
    pub id: i64,
    /// Owning client id.
    pub client_id: String,
    /// Role: "user", "assistant" or "system".
    pub role: String,
    /// Message content.
    pub content: String,
    /// Whether the message has been read (dashboard-facing).
    pub read: bool,
    /// Creation timestamp.
    pub created_at: String,
}
