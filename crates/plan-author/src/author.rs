//! The `PlanAuthor` trait and its implementations.

use async_trait::async_trait;
use intake_core::ClientProfile;
use reqwest::Client;
use tracing::{debug, info};

use crate::api_types::{ApiError, ChatCompletionRequest, ChatCompletionResponse, ChatMessage};
use crate::config::AuthorConfig;
use crate::error::AuthorError;
use crate::prompt;

/// Everything needed to answer one follow-up question: the stored plan (or
/// none), the prior user/assistant transcript in chronological order, and
/// the new question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionRequest {
    /// The client's stored plan text, if any.
    pub plan_text: Option<String>,
    /// Prior transcript, user/assistant rows only.
    pub history: Vec<ChatMessage>,
    /// The new question.
    pub question: String,
}

/// A trait for drafting plans and answering follow-up questions.
///
/// Implementations range from the HTTP completion client to canned test
/// doubles. Object-safe so handlers can hold `Arc<dyn PlanAuthor>`.
#[async_trait]
pub trait PlanAuthor: Send + Sync {
    /// Draft a personalized plan from a collected profile.
    async fn draft_plan(&self, profile: &ClientProfile) -> Result<String, AuthorError>;

    /// Answer a follow-up question about the client's plan.
    async fn answer_question(&self, request: &QuestionRequest) -> Result<String, AuthorError>;

    /// Human-readable name for this author implementation.
    fn name(&self) -> &str;
}

/// Plan author backed by an OpenAI-compatible chat-completions API.
pub struct HttpPlanAuthor {
    client: Client,
    config: AuthorConfig,
}

impl HttpPlanAuthor {
    /// Create a new author with the given configuration.
    pub fn new(config: AuthorConfig) -> Result<Self, AuthorError> {
        let client = Client::builder()
            .build()
            .map_err(|e| AuthorError::Configuration(format!("failed to create HTTP client: {e}")))?;

        info!(model = %config.model, "plan author initialized");

        Ok(Self { client, config })
    }

    /// Create an author from environment variables.
    pub fn from_env() -> Result<Self, AuthorError> {
        Self::new(AuthorConfig::from_env()?)
    }

    /// Make a chat completion request and return the first choice's text.
    async fn chat_completion(&self, messages: Vec<ChatMessage>) -> Result<String, AuthorError> {
        let url = format!("{}/v1/chat/completions", self.config.api_url);

        let request = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        debug!(model = %request.model, messages = request.messages.len(), "sending completion request");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| AuthorError::Network(format!("failed to send request: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();

            if let Ok(api_error) = serde_json::from_str::<ApiError>(&error_text) {
                return Err(AuthorError::Rejected(format!(
                    "API error ({}): {}",
                    status.as_u16(),
                    api_error.error.message
                )));
            }

            return Err(AuthorError::Rejected(format!(
                "API error ({}): {}",
                status.as_u16(),
                error_text
            )));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| AuthorError::Rejected(format!("failed to parse response: {e}")))?;

        if let Some(usage) = &completion.usage {
            debug!(total_tokens = usage.total_tokens, "completion finished");
        }

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| AuthorError::Rejected("empty completion".to_string()))
    }
}

#[async_trait]
impl PlanAuthor for HttpPlanAuthor {
    async fn draft_plan(&self, profile: &ClientProfile) -> Result<String, AuthorError> {
        self.chat_completion(prompt::plan_messages(profile)).await
    }

    async fn answer_question(&self, request: &QuestionRequest) -> Result<String, AuthorError> {
        self.chat_completion(prompt::question_messages(request)).await
    }

    fn name(&self) -> &str {
        "HttpPlanAuthor"
    }
}

/// An author that returns fixed responses and records every question
/// request it receives. Useful for exercising the state machine without any
/// AI processing.
#[derive(Debug, Default)]
pub struct CannedAuthor {
    plan: String,
    answer: String,
    questions: std::sync::Mutex<Vec<QuestionRequest>>,
}

impl CannedAuthor {
    /// Create a canned author with the given plan and answer texts.
    pub fn new(plan: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            plan: plan.into(),
            answer: answer.into(),
            questions: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// The question requests received so far.
    pub fn questions(&self) -> Vec<QuestionRequest> {
        self.questions.lock().expect("questions lock poisoned").clone()
    }
}

#[async_trait]
impl PlanAuthor for CannedAuthor {
    async fn draft_plan(&self, _profile: &ClientProfile) -> Result<String, AuthorError> {
        Ok(self.plan.clone())
    }

    async fn answer_question(&self, request: &QuestionRequest) -> Result<String, AuthorError> {
        self.questions
            .lock()
            .expect("questions lock poisoned")
            .push(request.clone());
        Ok(self.answer.clone())
    }

    fn name(&self) -> &str {
        "CannedAuthor"
    }
}
