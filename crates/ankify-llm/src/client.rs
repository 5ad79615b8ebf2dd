//! Async completion client
//!
//! Providers are synchronous; the client moves each call onto the blocking
//! pool, bounds it with a timeout and parses the payload as a JSON array.

use crate::parser::{parse_json_array, ParsedArray};
use crate::LlmError;
use ankify_domain::traits::CompletionProvider;
use ankify_domain::CompletionRequest;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::debug;

/// Default per-call timeout (120 seconds)
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(120);

/// Completion client shared by the extraction and synthesis stages
pub struct CompletionClient<P> {
    provider: Arc<P>,
    call_timeout: Duration,
}

impl<P> Clone for CompletionClient<P> {
    fn clone(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
            call_timeout: self.call_timeout,
        }
    }
}

impl<P> CompletionClient<P>
where
    P: CompletionProvider + Send + Sync + 'static,
    P::Error: Into<LlmError>,
{
    /// Wrap `provider` with the default timeout
    pub fn new(provider: P) -> Self {
        Self {
            provider: Arc::new(provider),
            call_timeout: DEFAULT_CALL_TIMEOUT,
        }
    }

    /// Override the per-call timeout
    pub fn with_timeout(mut self, call_timeout: Duration) -> Self {
        self.call_timeout = call_timeout;
        self
    }

    /// Whether the underlying provider has a credential configured
    pub fn has_credential(&self) -> bool {
        self.provider.has_credential()
    }

    /// Model identifier of the underlying provider
    pub fn model_name(&self) -> &str {
        self.provider.model_name()
    }

    /// Underlying provider
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Send `request` and return the raw payload
    pub async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError> {
        if !self.provider.has_credential() {
            return Err(LlmError::MissingCredential("OPENAI_API_KEY".to_string()));
        }

        debug!(
            "Completion request: {} system chars, {} user chars",
            request.system.len(),
            request.user.len()
        );

        let provider = Arc::clone(&self.provider);

        // Providers are blocking
        let call = tokio::task::spawn_blocking(move || -> Result<String, LlmError> {
            provider.complete(&request).map_err(Into::into)
        });

        let payload = timeout(self.call_timeout, call)
            .await
            .map_err(|_| LlmError::Timeout(self.call_timeout))?
            .map_err(|e| LlmError::Communication(format!("Task join error: {}", e)))??;

        debug!("Completion response length: {} chars", payload.len());
        Ok(payload)
    }

    /// Send `request` and parse the payload as a JSON array
    pub async fn complete_array(&self, request: CompletionRequest) -> Result<ParsedArray, LlmError> {
        let payload = self.complete(request).await?;
        parse_json_array(&payload)
    }
}
