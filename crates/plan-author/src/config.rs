//! Configuration for the HTTP plan author.

use std::env;

use crate::error::AuthorError;

/// Configuration for [`HttpPlanAuthor`](crate::HttpPlanAuthor).
#[derive(Debug, Clone)]
pub struct AuthorConfig {
    /// Completion API base URL.
    pub api_url: String,

    /// API key for authentication.
    pub api_key: String,

    /// Model name to use.
    pub model: String,

    /// Maximum tokens for a completion.
    pub max_tokens: Option<u32>,

    /// Temperature for generation.
    pub temperature: Option<f32>,
}

impl Default for AuthorConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.openai.com".to_string(),
            api_key: String::new(),
            model: "gpt-4o-mini".to_string(),
            max_tokens: Some(2048),
            temperature: Some(0.7),
        }
    }
}

impl AuthorConfig {
    /// Create configuration from environment variables.
    ///
    /// Required environment variables:
    /// - `PLAN_AUTHOR_API_KEY` - API key for authentication
    ///
    /// Optional environment variables:
    /// - `PLAN_AUTHOR_API_URL` - API URL (default: https://api.openai.com)
    /// - `PLAN_AUTHOR_MODEL` - Model name (default: gpt-4o-mini)
    /// - `PLAN_AUTHOR_MAX_TOKENS` - Max tokens (default: 2048)
    /// - `PLAN_AUTHOR_TEMPERATURE` - Temperature (default: 0.7)
    pub fn from_env() -> Result<Self, AuthorError> {
        let api_key = env::var("PLAN_AUTHOR_API_KEY")
            .map_err(|_| AuthorError::Configuration("PLAN_AUTHOR_API_KEY not set".to_string()))?;

        let api_url = env::var("PLAN_AUTHOR_API_URL")
            .unwrap_or_else(|_| "https://api.openai.com".to_string());

        let model =
            env::var("PLAN_AUTHOR_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string());

        let max_tokens = env::var("PLAN_AUTHOR_MAX_TOKENS")
            .ok()
            .and_then(|v| v.parse().ok())
            .or(Some(2048));

        let temperature = env::var("PLAN_AUTHOR_TEMPERATURE")
            .ok()
            .and_then(|v| v.parse().ok())
            .or(Some(0.7));

        Ok(Self {
            api_url,
            api_key,
            model,
            max_tokens,
            temperature,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AuthorConfig::default();

        assert_eq!(config.api_url, "https://api.openai.com");
        assert!(config.api_key.is_empty());
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.max_tokens, Some(2048));
        assert_eq!(config.temperature, Some(0.7));
    }

    // Env-based tests are combined into a single test to avoid race
    // conditions when tests run in parallel (env vars are process-global).
    #[test]
    fn test_from_env_scenarios() {
        use std::sync::Mutex;
        static ENV_LOCK: Mutex<()> = Mutex::new(());
        let _guard = ENV_LOCK.lock().unwrap();

        fn clear_vars() {
            std::env::remove_var("PLAN_AUTHOR_API_KEY");
            std::env::remove_var("PLAN_AUTHOR_API_URL");
            std::env::remove_var("PLAN_AUTHOR_MODEL");
            std::env::remove_var("PLAN_AUTHOR_MAX_TOKENS");
            std::env::remove_var("PLAN_AUTHOR_TEMPERATURE");
        }

        // Missing API key is fatal
        clear_vars();
        let result = AuthorConfig::from_env();
        match result {
            Err(AuthorError::Configuration(msg)) => {
                assert!(msg.contains("PLAN_AUTHOR_API_KEY"));
            }
            other => panic!("expected Configuration error, got {other:?}"),
        }

        // Only key set, defaults used
        clear_vars();
        std::env::set_var("PLAN_AUTHOR_API_KEY", "test-key");
        let config = AuthorConfig::from_env().unwrap();
        assert_eq!(config.api_key, "test-key");
        assert_eq!(config.model, "gpt-4o-mini");

        // Overrides applied
        std::env::set_var("PLAN_AUTHOR_API_URL", "https://llm.test");
        std::env::set_var("PLAN_AUTHOR_MODEL", "gpt-4o");
        std::env::set_var("PLAN_AUTHOR_MAX_TOKENS", "512");
        std::env::set_var("PLAN_AUTHOR_TEMPERATURE", "0.2");
        let config = AuthorConfig::from_env().unwrap();
        assert_eq!(config.api_url, "https://llm.test");
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.max_tokens, Some(512));
        assert_eq!(config.temperature, Some(0.2));

        clear_vars();
    }
}
