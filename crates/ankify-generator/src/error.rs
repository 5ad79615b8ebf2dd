//! Error types for the Generator

use ankify_extractor::ExtractorError;
use ankify_llm::LlmError;
use ankify_synthesizer::SynthesizerError;
use thiserror::Error;

/// Errors that abort a generation run
#[derive(Error, Debug)]
pub enum GenerationError {
    /// Missing or invalid configuration, such as an absent API key
    #[error("Configuration error: {0}")]
    Config(String),

    /// Completion service failed (status, transport or timeout)
    #[error("Completion service error: {0}")]
    Service(LlmError),

    /// Completion payload held no recoverable JSON array
    #[error("Malformed completion response: {0}")]
    MalformedResponse(String),

    /// Subscriber has no active subscription
    #[error("Subscription inactive for '{0}'")]
    SubscriptionInactive(String),

    /// Monthly card cap reached
    #[error("Monthly card limit reached ({used} of {cap} used)")]
    QuotaExhausted {
        /// Cards used this month
        used: u64,
        /// Monthly cap
        cap: u64,
    },

    /// Exhaustive pipeline found no facts
    #[error("No extractable facts found; try a smaller words_per_chunk")]
    NoFactsExtracted,

    /// Pipeline accepted no cards
    #[error("No cards generated; try lowering yield or providing more text")]
    NoCardsGenerated,

    /// Usage ledger could not be read or written
    #[error("Usage ledger error: {0}")]
    Usage(String),

    /// Deck exporter failed
    #[error("Export error: {0}")]
    Export(String),
}

impl From<LlmError> for GenerationError {
    fn from(e: LlmError) -> Self {
        if e.is_config() {
            GenerationError::Config(e.to_string())
        } else if e.is_malformed() {
            GenerationError::MalformedResponse(e.to_string())
        } else {
            GenerationError::Service(e)
        }
    }
}

impl From<ExtractorError> for GenerationError {
    fn from(e: ExtractorError) -> Self {
        e.into_llm().into()
    }
}

impl From<SynthesizerError> for GenerationError {
    fn from(e: SynthesizerError) -> Self {
        e.into_llm().into()
    }
}
