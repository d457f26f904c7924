//! The bot's error taxonomy.
//!
//! Every failure a state handler can hit collapses into this closed set,
//! and the message shown to the client comes from [`BotError::user_message`]
//! only; raw error text never reaches the chat.

use blob_store::BlobError;
use database::DatabaseError;
use plan_author::AuthorError;
use thiserror::Error;
use whatsapp_gateway::GatewayError;

/// Errors that can occur while handling an inbound message.
#[derive(Debug, Error)]
pub enum BotError {
    /// The inbound payload was unusable.
    #[error("validation error: {0}")]
    Validation(String),

    /// An external dependency did not answer in time.
    #[error("{dependency} timed out")]
    DependencyTimeout { dependency: &'static str },

    /// An external dependency answered with a failure.
    #[error("{dependency} rejected the call: {message}")]
    DependencyRejected {
        dependency: &'static str,
        message: String,
    },

    /// Database error.
    #[error("database error: {0}")]
    Database(#[from] DatabaseError),

    /// Anything that should never happen in normal operation.
    #[error("internal error: {0}")]
    Internal(String),
}

impl BotError {
    /// The message sent back to the client when this error is swallowed at
    /// the handler boundary. Fixed per taxonomy entry, in the conversation's
    /// language.
    pub fn user_message(&self) -> &'static str {
        match self {
            BotError::Validation(_) => {
                "Não consegui entender a sua mensagem. Pode tentar de novo?"
            }
            BotError::DependencyTimeout { .. } => {
                "O sistema demorou mais do que o esperado. Pode tentar novamente em instantes?"
            }
            BotError::DependencyRejected { .. } => {
                "Não consegui concluir agora. Pode tentar novamente em instantes?"
            }
            BotError::Database(_) | BotError::Internal(_) => {
                "Tivemos um problema por aqui. Tente novamente em alguns minutos."
            }
        }
    }
}

impl From<GatewayError> for BotError {
    fn from(e: GatewayError) -> Self {
        match e {
            GatewayError::Config(msg) => BotError::Internal(msg),
            other => BotError::DependencyRejected {
                dependency: "messaging gateway",
                message: other.to_string(),
            },
        }
    }
}

impl From<AuthorError> for BotError {
    fn from(e: AuthorError) -> Self {
        match e {
            AuthorError::Configuration(msg) => BotError::Internal(msg),
            other => BotError::DependencyRejected {
                dependency: "plan author",
                message: other.to_string(),
            },
        }
    }
}

impl From<BlobError> for BotError {
    fn from(e: BlobError) -> Self {
        match e {
            BlobError::Config(msg) => BotError::Internal(msg),
            other => BotError::DependencyRejected {
                dependency: "blob storage",
                message: other.to_string(),
            },
        }
    }
}

impl From<pdf_render::RenderError> for BotError {
    fn from(e: pdf_render::RenderError) -> Self {
        BotError::Internal(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages_never_leak_error_text() {
        let err = BotError::DependencyRejected {
            dependency: "plan author",
            message: "API error (500): secret internals".to_string(),
        };

        assert!(!err.user_message().contains("secret"));
        assert!(!err.user_message().contains("500"));
    }

    #[test]
    fn test_timeout_and_rejection_are_distinct() {
        let timeout = BotError::DependencyTimeout { dependency: "plan author" };
        let rejected = BotError::DependencyRejected {
            dependency: "plan author",
            message: "no".to_string(),
        };

        assert_ne!(timeout.user_message(), rejected.user_message());
    }
}
