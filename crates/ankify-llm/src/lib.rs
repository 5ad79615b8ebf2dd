//! Ankify LLM Provider Layer
//!
//! Completion provider implementations and the client the generation
//! pipeline talks to.
//!
//! # Architecture
//!
//! This crate provides implementations of the `CompletionProvider` trait from
//! `ankify-domain`, plus a [`CompletionClient`] that wraps any provider with a
//! per-call timeout and parses the payload as a JSON array.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing
//! - `OpenAiProvider`: OpenAI-compatible `/chat/completions` endpoint
//!
//! # Examples
//!
//! ```
//! use ankify_llm::MockProvider;
//! use ankify_domain::traits::CompletionProvider;
//! use ankify_domain::CompletionRequest;
//!
//! let provider = MockProvider::new("[]");
//! let request = CompletionRequest::new("system", "user", 0.2, 100);
//! assert_eq!(provider.complete(&request).unwrap(), "[]");
//! ```

#![warn(missing_docs)]

pub mod client;
pub mod openai;
pub mod parser;

use ankify_domain::traits::CompletionProvider;
use ankify_domain::CompletionRequest;
use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use thiserror::Error;

pub use client::CompletionClient;
pub use openai::OpenAiProvider;
pub use parser::{parse_json_array, ParseStrategy, ParsedArray};

/// Errors that can occur during completion calls
#[derive(Error, Debug)]
pub enum LlmError {
    /// No API credential configured
    #[error("Missing credential: {0} is not set")]
    MissingCredential(String),

    /// Network or transport failure
    #[error("Communication error: {0}")]
    Communication(String),

    /// Service answered with a non-success status
    #[error("Service returned HTTP {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, as far as it could be read
        body: String,
    },

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Call did not finish within the configured timeout
    #[error("Completion call timed out after {0:?}")]
    Timeout(Duration),

    /// Response envelope did not have the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Payload did not contain a recoverable JSON array
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

impl LlmError {
    /// Whether this error stems from missing configuration
    pub fn is_config(&self) -> bool {
        matches!(self, LlmError::MissingCredential(_))
    }

    /// Whether this error stems from an unparsable payload
    pub fn is_malformed(&self) -> bool {
        matches!(self, LlmError::MalformedResponse(_))
    }
}

type Responder = Arc<dyn Fn(&CompletionRequest, usize) -> String + Send + Sync>;

#[derive(Debug, Clone)]
enum MockReply {
    Text(String),
    Error(String),
}

#[derive(Default)]
struct MockState {
    queue: VecDeque<MockReply>,
    keyed: Vec<(String, MockReply)>,
    requests: Vec<CompletionRequest>,
    call_count: usize,
}

/// Mock completion provider for deterministic testing
///
/// Replies are chosen in this order:
/// 1. the next scripted reply pushed with [`push_response`](Self::push_response)
///    or [`push_error`](Self::push_error)
/// 2. the first keyed reply whose key occurs in the user instruction
/// 3. the responder closure, if one was installed
/// 4. the default response
///
/// Clones share state, so a clone handed to a client can be inspected later.
///
/// # Examples
///
/// ```
/// use ankify_llm::MockProvider;
/// use ankify_domain::traits::CompletionProvider;
/// use ankify_domain::CompletionRequest;
///
/// let mut provider = MockProvider::default();
/// provider.add_response("FACTS", r#"[{"front": "Q", "back": "A"}]"#);
/// provider.push_response("[]");
///
/// let request = CompletionRequest::new("sys", "FACTS: ...", 0.2, 10);
/// assert_eq!(provider.complete(&request).unwrap(), "[]");
/// assert!(provider.complete(&request).unwrap().contains("front"));
/// assert_eq!(provider.call_count(), 2);
/// ```
#[derive(Clone)]
pub struct MockProvider {
    default_response: String,
    responder: Option<Responder>,
    state: Arc<Mutex<MockState>>,
    has_credential: bool,
    model_name: String,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all requests
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            responder: None,
            state: Arc::new(Mutex::new(MockState::default())),
            has_credential: true,
            model_name: "mock".to_string(),
        }
    }

    /// Create a provider that computes each reply from the request and the
    /// zero-based call index
    pub fn from_fn<F>(responder: F) -> Self
    where
        F: Fn(&CompletionRequest, usize) -> String + Send + Sync + 'static,
    {
        let mut provider = Self::new("[]");
        provider.responder = Some(Arc::new(responder));
        provider
    }

    /// Report no configured credential
    pub fn without_credential(mut self) -> Self {
        self.has_credential = false;
        self
    }

    /// Override the reported model name
    pub fn with_model_name(mut self, model_name: impl Into<String>) -> Self {
        self.model_name = model_name.into();
        self
    }

    /// Reply with `response` whenever the user instruction contains `key`
    pub fn add_response(&mut self, key: impl Into<String>, response: impl Into<String>) {
        self.lock()
            .keyed
            .push((key.into(), MockReply::Text(response.into())));
    }

    /// Fail whenever the user instruction contains `key`
    pub fn add_error(&mut self, key: impl Into<String>) {
        self.lock()
            .keyed
            .push((key.into(), MockReply::Error("Mock error".to_string())));
    }

    /// Queue a one-shot reply
    pub fn push_response(&self, response: impl Into<String>) {
        self.lock().queue.push_back(MockReply::Text(response.into()));
    }

    /// Queue a one-shot failure
    pub fn push_error(&self, message: impl Into<String>) {
        self.lock().queue.push_back(MockReply::Error(message.into()));
    }

    /// Get the number of times complete was called
    pub fn call_count(&self) -> usize {
        self.lock().call_count
    }

    /// Reset the call count
    pub fn reset_call_count(&self) {
        self.lock().call_count = 0;
    }

    /// Every request received so far, in order
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.lock().requests.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("[]")
    }
}

impl fmt::Debug for MockProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockProvider")
            .field("default_response", &self.default_response)
            .field("has_responder", &self.responder.is_some())
            .field("has_credential", &self.has_credential)
            .field("model_name", &self.model_name)
            .finish()
    }
}

impl CompletionProvider for MockProvider {
    type Error = LlmError;

    fn complete(&self, request: &CompletionRequest) -> Result<String, Self::Error> {
        let (reply, index) = {
            let mut state = self.lock();
            let index = state.call_count;
            state.call_count += 1;
            state.requests.push(request.clone());

            let reply = state.queue.pop_front().or_else(|| {
                state
                    .keyed
                    .iter()
                    .find(|(key, _)| request.user.contains(key.as_str()))
                    .map(|(_, reply)| reply.clone())
            });
            (reply, index)
        };

        match reply {
            Some(MockReply::Text(text)) => Ok(text),
            Some(MockReply::Error(message)) => Err(LlmError::Other(message)),
            None => match &self.responder {
                Some(responder) => Ok(responder(request, index)),
                None => Ok(self.default_response.clone()),
            },
        }
    }

    fn has_credential(&self) -> bool {
        self.has_credential
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}
