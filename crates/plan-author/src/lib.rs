//! AI plan author for the WhatsApp intake bot.
//!
//! This crate defines:
//!
//! - [`PlanAuthor`] - the trait the state machine drafts plans and answers
//!   questions through
//! - [`HttpPlanAuthor`] - the OpenAI-compatible chat-completions client
//! - [`CannedAuthor`] - a fixed-response test double
//! - [`prompt`] - pure prompt-assembly functions
//!
//! # Example
//!
//! ```no_run
//! use plan_author::{HttpPlanAuthor, PlanAuthor};
//! use intake_core::ClientProfile;
//!
//! # async fn example() -> Result<(), plan_author::AuthorError> {
//! let author = HttpPlanAuthor::from_env()?;
//! let plan = author.draft_plan(&ClientProfile::default()).await?;
//! println!("{plan}");
//! # Ok(())
//! # }
//! ```

mod api_types;
mod author;
mod config;
mod error;
pub mod prompt;

pub use api_types::ChatMessage;
pub use author::{CannedAuthor, HttpPlanAuthor, PlanAuthor, QuestionRequest};
pub use config::AuthorConfig;
pub use error::AuthorError;

// Re-export async_trait for downstream implementations.
pub use async_trait::async_trait;
