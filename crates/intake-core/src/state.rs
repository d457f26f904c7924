//! Conversation states.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// The conversation state machine's closed set of states.
///
/// Stored as TEXT on the conversation row. `Start` is the implicit state of
/// a client with no conversation row; it is never written back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversationState {
    /// No conversation yet; the next message starts intake.
    Start,
    /// Collecting profile fields one message at a time.
    WaitingForInfo,
    /// Profile complete; waiting for a payment confirmation.
    WaitingForPayment,
    /// Payment confirmed; the plan pipeline runs on every inbound message
    /// until it succeeds.
    Paid,
    /// Plan delivered; free-form Q&A about the plan.
    Questions,
}

/// A state string that does not name a known state.
#[derive(Debug, Error)]
#[error("unknown conversation state: {0}")]
pub struct UnknownState(pub String);

impl ConversationState {
    /// The TEXT value stored on the conversation row.
    pub fn as_str(&self) -> &'static str {
        match self {
            ConversationState::Start => "START",
            ConversationState::WaitingForInfo => "WAITING_FOR_INFO",
            ConversationState::WaitingForPayment => "WAITING_FOR_PAYMENT",
            ConversationState::Paid => "PAID",
            ConversationState::Questions => "QUESTIONS",
        }
    }
}

impl fmt::Display for ConversationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConversationState {
    type Err = UnknownState;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "START" => Ok(ConversationState::Start),
            "WAITING_FOR_INFO" => Ok(ConversationState::WaitingForInfo),
            "WAITING_FOR_PAYMENT" => Ok(ConversationState::WaitingForPayment),
            "PAID" => Ok(ConversationState::Paid),
            "QUESTIONS" => Ok(ConversationState::Questions),
            other => Err(UnknownState(other.to_string())),
        }
    }
}
