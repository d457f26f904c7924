//! SQLite persistence layer for the WhatsApp intake bot.
//!
//! This crate provides async database operations for clients, conversations,
//! and the chat transcript using SQLx with SQLite.
//!
//! # Example
//!
//! ```no_run
//! use database::{client, Database};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connect and run migrations
//!     let db = Database::connect("sqlite:bot.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     // First contact creates the client row
//!     let client = client::find_or_create_by_phone(db.pool(), "351911111111").await?;
//!     println!("client id: {}", client.id);
//!
//!     Ok(())
//! }
//! ```

pub mod chat_message;
pub mod client;
pub mod conversation;
pub mod error;
pub mod models;

pub use error::{DatabaseError, Result};
pub use models::{ChatMessage, Client, Conversation};

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

/// Database connection wrapper.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Default pool size for database connections.
    const DEFAULT_POOL_SIZE: u32 = 20;

    /// Connect to a SQLite database.
    ///
    /// The URL should be in the format `sqlite:path/to/db.sqlite?mode=rwc`.
    /// Use `sqlite::memory:` for tests.
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_pool_size(url, Self::DEFAULT_POOL_SIZE).await
    }

    /// Connect to a SQLite database with a custom pool size.
    pub async fn connect_with_pool_size(url: &str, pool_size: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect_with(options)
            .await?;

        tracing::info!("Connected to database: {} (pool size: {})", url, pool_size);

        Ok(Self { pool })
    }

    /// Run database migrations.
    ///
    /// This should be called once after connecting to ensure the schema is up to date.
    pub async fn migrate(&self) -> Result<()> {
        tracing::info!("Running database migrations...");

        sqlx::migrate!("./migrations").run(&self.pool).await?;

        tracing::info!("Migrations complete");
        Ok(())
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the database connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use intake_core::{ClientProfile, ConversationState, ProfileField};

    async fn test_db() -> Database {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();
        db
    }

    #[tokio::test]
    async fn test_find_or_create_is_lazy_and_idempotent() {
        let db = test_db().await;

        assert!(client::find_by_phone(db.pool(), "351911111111")
            .await
            .unwrap()
            .is_none());

        let created = client::find_or_create_by_phone(db.pool(), "351911111111")
            .await
            .unwrap();
        let found = client::find_or_create_by_phone(db.pool(), "351911111111")
            .await
            .unwrap();

        assert_eq!(created.id, found.id);
        assert!(!created.paid);
        assert!(created.ai_enabled);
        assert_eq!(client::count(db.pool()).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_apply_profile_and_mark_paid() {
        let db = test_db().await;
        let c = client::find_or_create_by_phone(db.pool(), "351922222222")
            .await
            .unwrap();

        let mut profile = ClientProfile::default();
        ProfileField::Name.set(&mut profile, "João");
        ProfileField::Weight.set(&mut profile, "80kg");
        client::apply_profile(db.pool(), &c.id, &profile).await.unwrap();
        client::set_plan_text(db.pool(), &c.id, "plano de treino").await.unwrap();
        client::mark_paid(db.pool(), &c.id, "https://cdn.example/plan.pdf")
            .await
            .unwrap();

        let stored = client::get(db.pool(), &c.id).await.unwrap();
        assert_eq!(stored.name.as_deref(), Some("João"));
        assert_eq!(stored.weight.as_deref(), Some("80kg"));
        assert_eq!(stored.plan_text.as_deref(), Some("plano de treino"));
        assert_eq!(stored.plan_url.as_deref(), Some("https://cdn.example/plan.pdf"));
        assert!(stored.paid);
    }

    #[tokio::test]
    async fn test_update_missing_client_is_not_found() {
        let db = test_db().await;

        let result = client::set_ai_enabled(db.pool(), "no-such-id", false).await;
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_latest_conversation_wins() {
        let db = test_db().await;
        let c = client::find_or_create_by_phone(db.pool(), "351933333333")
            .await
            .unwrap();

        assert!(conversation::latest_for_client(db.pool(), &c.id)
            .await
            .unwrap()
            .is_none());

        let first = conversation::create(
            db.pool(),
            &c.id,
            ConversationState::WaitingForInfo.as_str(),
            "{}",
        )
        .await
        .unwrap();
        let second = conversation::create(
            db.pool(),
            &c.id,
            ConversationState::Questions.as_str(),
            "{}",
        )
        .await
        .unwrap();

        // Same-second creation: rowid breaks the tie in favor of the newest.
        let latest = conversation::latest_for_client(db.pool(), &c.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(latest.id, second.id);
        assert_ne!(latest.id, first.id);
    }

    #[tokio::test]
    async fn test_conversation_state_and_context_updates() {
        let db = test_db().await;
        let c = client::find_or_create_by_phone(db.pool(), "351944444444")
            .await
            .unwrap();
        let conv = conversation::create(
            db.pool(),
            &c.id,
            ConversationState::WaitingForInfo.as_str(),
            "{}",
        )
        .await
        .unwrap();

        conversation::update_context(db.pool(), &conv.id, r#"{"name":"Ana"}"#)
            .await
            .unwrap();
        conversation::update_state(
            db.pool(),
            &conv.id,
            ConversationState::WaitingForPayment.as_str(),
        )
        .await
        .unwrap();

        let stored = conversation::get(db.pool(), &conv.id).await.unwrap();
        assert_eq!(stored.state, "WAITING_FOR_PAYMENT");
        assert_eq!(stored.context, r#"{"name":"Ana"}"#);
    }

    #[tokio::test]
    async fn test_history_excludes_system_rows_and_keeps_order() {
        let db = test_db().await;
        let c = client::find_or_create_by_phone(db.pool(), "351955555555")
            .await
            .unwrap();

        chat_message::append(db.pool(), &c.id, "user", "olá").await.unwrap();
        chat_message::append(db.pool(), &c.id, "assistant", "bem-vindo")
            .await
            .unwrap();
        chat_message::append(db.pool(), &c.id, "system", "internal note")
            .await
            .unwrap();
        chat_message::append(db.pool(), &c.id, "user", "quero um plano")
            .await
            .unwrap();

        let history = chat_message::history_for_client(db.pool(), &c.id)
            .await
            .unwrap();
        let roles: Vec<&str> = history.iter().map(|m| m.role.as_str()).collect();
        let contents: Vec<&str> = history.iter().map(|m| m.content.as_str()).collect();

        assert_eq!(roles, ["user", "assistant", "user"]);
        assert_eq!(contents, ["olá", "bem-vindo", "quero um plano"]);
        assert_eq!(chat_message::count_for_client(db.pool(), &c.id).await.unwrap(), 4);
    }
}
