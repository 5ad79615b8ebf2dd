//! OpenAI Provider Implementation
//!
//! Talks to any OpenAI-compatible `/chat/completions` endpoint with bearer
//! authentication and returns the first choice's message content.
//!
//! # Features
//!
//! - Blocking HTTP client with a request timeout
//! - Configurable endpoint and model
//! - No retries; callers decide what a failed call means
//!
//! # Examples
//!
//! ```no_run
//! use ankify_llm::OpenAiProvider;
//!
//! let provider = OpenAiProvider::new("sk-...", "gpt-4o-mini").unwrap();
//! ```

use crate::LlmError;
use ankify_domain::traits::CompletionProvider;
use ankify_domain::CompletionRequest;
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Default API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default model
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default timeout for completion requests (120 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Environment variable holding the API key
pub const API_KEY_VAR: &str = "OPENAI_API_KEY";

/// OpenAI-compatible chat completion provider
pub struct OpenAiProvider {
    base_url: String,
    api_key: String,
    model: String,
    timeout: Duration,
    client: Client,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

impl OpenAiProvider {
    /// Create a provider against the default endpoint
    ///
    /// An empty `api_key` is accepted here; the provider then reports no
    /// credential and every call fails with [`LlmError::MissingCredential`].
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self, LlmError> {
        Self::with_timeout(api_key, model, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a provider with a specific request timeout
    pub fn with_timeout(
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::Communication(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into().trim().to_string(),
            model: model.into(),
            timeout,
            client,
        })
    }

    /// Point the provider at another OpenAI-compatible endpoint
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

impl CompletionProvider for OpenAiProvider {
    type Error = LlmError;

    fn complete(&self, request: &CompletionRequest) -> Result<String, Self::Error> {
        if self.api_key.is_empty() {
            return Err(LlmError::MissingCredential(API_KEY_VAR.to_string()));
        }

        let body = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &request.system,
                },
                ChatMessage {
                    role: "user",
                    content: &request.user,
                },
            ],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        debug!(model = %self.model, prompt_chars = request.user.len(), "Sending completion request");

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout(self.timeout)
                } else {
                    LlmError::Communication(format!("Request failed: {}", e))
                }
            })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(LlmError::RateLimitExceeded);
        }
        if status == StatusCode::NOT_FOUND {
            return Err(LlmError::ModelNotAvailable(self.model.clone()));
        }
        if !status.is_success() {
            let body = response
                .text()
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(LlmError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response
            .json()
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| LlmError::InvalidResponse("missing choices[0].message.content".to_string()))
    }

    fn has_credential(&self) -> bool {
        !self.api_key.is_empty()
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openai_provider_creation() {
        let provider = OpenAiProvider::new("sk-test", "gpt-4o-mini").unwrap();
        assert_eq!(provider.base_url, DEFAULT_BASE_URL);
        assert_eq!(provider.model_name(), "gpt-4o-mini");
        assert!(provider.has_credential());
    }

    #[test]
    fn test_custom_base_url_trims_slash() {
        let provider = OpenAiProvider::new("sk-test", DEFAULT_MODEL)
            .unwrap()
            .with_base_url("http://localhost:8080/v1/");
        assert_eq!(provider.endpoint(), "http://localhost:8080/v1/chat/completions");
    }

    #[test]
    fn test_missing_credential_fails_without_network() {
        let provider = OpenAiProvider::new("   ", DEFAULT_MODEL).unwrap();
        assert!(!provider.has_credential());

        let request = CompletionRequest::new("sys", "user", 0.1, 10);
        let result = provider.complete(&request);
        assert!(matches!(result, Err(LlmError::MissingCredential(_))));
    }

    #[test]
    fn test_request_serialization_shape() {
        let body = ChatRequest {
            model: "m",
            messages: [
                ChatMessage { role: "system", content: "s" },
                ChatMessage { role: "user", content: "u" },
            ],
            temperature: 0.5,
            max_tokens: 42,
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["content"], "u");
        assert_eq!(value["max_tokens"], 42);
    }

    #[test]
    fn test_unreachable_endpoint_is_communication_error() {
        let provider = OpenAiProvider::with_timeout("sk-test", DEFAULT_MODEL, Duration::from_secs(2))
            .unwrap()
            .with_base_url("http://127.0.0.1:9");

        let request = CompletionRequest::new("sys", "user", 0.1, 10);
        match provider.complete(&request) {
            Err(LlmError::Communication(_)) | Err(LlmError::Timeout(_)) => {}
            other => panic!("Expected transport error, got {:?}", other.map(|_| ())),
        }
    }
}
