use crate::error::GenerateError;
use crate::types::{ChatRequest, ChatResponse, CompletionRequest, CompletionResponse, Message};
use tracing::debug;

/// Engine name selecting the local backend.
pub const ENGINE_LOCAL: &str = "local";
/// Engine name selecting the hosted backend.
pub const ENGINE_HOSTED: &str = "hosted";

/// Backend configuration, read once at process start and passed into the
/// generator. No environment lookups happen after construction.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub local_url: String,
    pub hosted_url: String,
    pub hosted_api_key: Option<String>,
    pub local_model: String,
    pub hosted_model: String,
    /// Kept as the raw configured string; resolved per request so an
    /// unrecognized value falls back to the local backend the same way
    /// an unrecognized request parameter does.
    pub default_engine: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            // Ollama default
            local_url: "http://localhost:11434/api/generate".to_string(),
            hosted_url: "https://api.openai.com/v1/chat/completions".to_string(),
            hosted_api_key: None,
            local_model: "qwen3:8b".to_string(),
            hosted_model: "gpt-3.5-turbo".to_string(),
            default_engine: ENGINE_LOCAL.to_string(),
        }
    }
}

impl LlmConfig {
    /// Read configuration from the environment, keeping the built-in
    /// defaults for anything unset. An empty credential counts as unset.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            local_url: env_or("LOCAL_LLM_URL", defaults.local_url),
            hosted_url: env_or("HOSTED_LLM_URL", defaults.hosted_url),
            hosted_api_key: std::env::var("HOSTED_API_KEY")
                .ok()
                .filter(|key| !key.is_empty()),
            local_model: env_or("LOCAL_DEFAULT_MODEL", defaults.local_model),
            hosted_model: env_or("HOSTED_DEFAULT_MODEL", defaults.hosted_model),
            default_engine: env_or("DEFAULT_ENGINE", defaults.default_engine),
        }
    }
}

fn env_or(key: &str, default: String) -> String {
    std::env::var(key).unwrap_or(default)
}

/// A model backend that turns a system/user prompt pair into raw text.
#[allow(async_fn_in_trait)]
pub trait ModelBackend {
    fn model_name(&self) -> &str;

    async fn complete(&self, system: &str, user: &str) -> Result<String, GenerateError>;
}

/// Ollama-style generate endpoint. The system and user prompts travel
/// concatenated in the single `prompt` field.
#[derive(Debug)]
pub struct LocalBackend {
    http: reqwest::Client,
    url: String,
    model: String,
}

impl LocalBackend {
    pub fn new(http: reqwest::Client, url: String, model: String) -> Self {
        Self { http, url, model }
    }
}

impl ModelBackend for LocalBackend {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn complete(&self, system: &str, user: &str) -> Result<String, GenerateError> {
        let request = CompletionRequest {
            model: self.model.clone(),
            prompt: format!("{system}\n\n{user}"),
            stream: false,
        };

        debug!("local backend request to {}", self.url);

        let response = self
            .http
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                GenerateError::BackendUnavailable(format!("request to {} failed: {e}", self.url))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerateError::BackendUnavailable(format!(
                "local backend returned {status}: {body}"
            )));
        }

        let completion: CompletionResponse = response.json().await.map_err(|e| {
            GenerateError::BackendUnavailable(format!("invalid local backend response: {e}"))
        })?;

        Ok(completion.response)
    }
}

/// OpenAI-style chat-completions endpoint.
#[derive(Debug)]
pub struct HostedBackend {
    http: reqwest::Client,
    url: String,
    api_key: String,
    model: String,
}

impl HostedBackend {
    /// Fails when no credential is configured. The check runs before any
    /// request exists; a misconfigured deployment never dials out.
    pub fn from_config(
        http: reqwest::Client,
        config: &LlmConfig,
        model: String,
    ) -> Result<Self, GenerateError> {
        let api_key = config.hosted_api_key.clone().ok_or_else(|| {
            GenerateError::BackendUnavailable("HOSTED_API_KEY is not set".to_string())
        })?;
        Ok(Self {
            http,
            url: config.hosted_url.clone(),
            api_key,
            model,
        })
    }
}

impl ModelBackend for HostedBackend {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn complete(&self, system: &str, user: &str) -> Result<String, GenerateError> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![Message::system(system), Message::user(user)],
            temperature: 0.1,
        };

        debug!("hosted backend request to {}", self.url);

        let response = self
            .http
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                GenerateError::BackendUnavailable(format!("request to {} failed: {e}", self.url))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerateError::BackendUnavailable(format!(
                "hosted backend returned {status}: {body}"
            )));
        }

        let chat: ChatResponse = response.json().await.map_err(|e| {
            GenerateError::BackendUnavailable(format!("invalid hosted backend response: {e}"))
        })?;

        let choice = chat.choices.into_iter().next().ok_or_else(|| {
            GenerateError::BackendUnavailable("hosted backend returned no choices".to_string())
        })?;

        Ok(choice.message.content)
    }
}
