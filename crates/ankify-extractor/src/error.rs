//! Error types for the Extractor

use ankify_llm::LlmError;
use thiserror::Error;

/// Errors that can occur during fact extraction
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// Completion call or payload failure
    #[error(transparent)]
    Llm(#[from] LlmError),
}

impl ExtractorError {
    /// Underlying completion error
    pub fn into_llm(self) -> LlmError {
        match self {
            ExtractorError::Llm(e) => e,
        }
    }
}
