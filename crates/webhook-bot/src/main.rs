//! WhatsApp webhook bot.
//!
//! Converses with prospective clients over WhatsApp: collects a profile,
//! gates on a payment confirmation, generates and delivers a personalized
//! plan as a PDF, then answers follow-up questions about it.

mod config;
mod error;
mod locks;
mod machine;
mod sender;
mod state;
mod texts;
mod webhook;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use blob_store::HttpBlobStore;
use database::Database;
use plan_author::HttpPlanAuthor;
use tracing::info;
use whatsapp_gateway::{GatewayConfig, WhatsAppClient};

use crate::config::Config;
use crate::machine::IntakeMachine;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    // Load configuration; missing gateway/author/store credentials abort
    // startup here rather than degrading at runtime.
    let config = Config::from_env()?;
    info!(addr = %config.addr, "Starting webhook bot");

    // Connect to database
    let db = Database::connect(&config.database_url).await?;
    db.migrate().await?;
    info!(
        clients = database::client::count(db.pool()).await?,
        "store ready"
    );

    // External collaborators
    let gateway = WhatsAppClient::new(GatewayConfig::from_env()?)?;
    let author = HttpPlanAuthor::from_env()?;
    let blobs = HttpBlobStore::from_env()?;

    // The state machine driving every webhook
    let machine = IntakeMachine::new(
        db.clone(),
        Arc::new(gateway),
        Arc::new(author),
        Arc::new(blobs),
        config.payment_link.clone(),
    );
    let state = AppState::new(Arc::new(machine));

    // Build router
    let app = Router::new()
        .route("/health", get(webhook::health))
        .route("/webhook", post(webhook::receive))
        .with_state(state);

    // Start server
    info!(addr = %config.addr, "Webhook bot listening");
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
