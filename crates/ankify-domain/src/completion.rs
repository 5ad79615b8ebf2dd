//! Completion requests sent to the external text-completion service

/// One call to the completion service
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// System instruction
    pub system: String,

    /// User instruction (prompt template filled with chunk or fact data)
    pub user: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Upper bound on response tokens
    pub max_tokens: u32,
}

impl CompletionRequest {
    /// Create a request with the given instructions and sizing
    pub fn new(
        system: impl Into<String>,
        user: impl Into<String>,
        temperature: f32,
        max_tokens: u32,
    ) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
            temperature,
            max_tokens,
        }
    }
}
