//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generation run failed
    #[error(transparent)]
    Generation(#[from] ankify_generator::GenerationError),

    /// Completion provider could not be set up
    #[error("Completion provider error: {0}")]
    Llm(#[from] ankify_llm::LlmError),

    /// Usage ledger error
    #[error("Usage ledger error: {0}")]
    Ledger(#[from] ankify_ledger::LedgerError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
