//! Error types for the Synthesizer

use ankify_llm::LlmError;
use thiserror::Error;

/// Errors that can occur during card synthesis
#[derive(Error, Debug)]
pub enum SynthesizerError {
    /// Completion call or payload failure
    #[error(transparent)]
    Llm(#[from] LlmError),
}

impl SynthesizerError {
    /// Underlying completion error
    pub fn into_llm(self) -> LlmError {
        match self {
            SynthesizerError::Llm(e) => e,
        }
    }
}
