//! Configuration for the Generator

use ankify_extractor::{CHUNK_OVERLAP_WORDS, DEFAULT_CHUNK_WORDS, MIN_CHUNK_WORDS};
use ankify_synthesizer::FACT_BATCH_SIZE;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::yield_model::{FACTS_PER_1000_WORDS, MIN_FACTS_PER_CHUNK};

/// Configuration for the Generator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Words shared by consecutive chunks
    pub chunk_overlap_words: usize,

    /// Smallest accepted chunk size (words)
    pub min_words_per_chunk: usize,

    /// Chunk size when the request does not name one (words)
    pub default_words_per_chunk: usize,

    /// Facts sent per cardization call in the exhaustive pipeline
    pub fact_batch_size: usize,

    /// Facts requested per 1000 chunk words in the exhaustive pipeline
    pub facts_per_1000_words: f64,

    /// Fewest facts requested from a chunk in the exhaustive pipeline
    pub min_facts_per_chunk: usize,

    /// Yield at or below which the exhaustive pipeline runs
    pub exhaustive_threshold: f64,

    /// Upper bound on round-robin sweep passes in the balanced pipeline
    pub max_sweep_passes: usize,

    /// Maximum time for a single completion call (seconds)
    pub call_timeout_secs: u64,
}

impl GeneratorConfig {
    /// Get the call timeout as a Duration
    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.min_words_per_chunk < MIN_CHUNK_WORDS {
            return Err(format!(
                "min_words_per_chunk must be at least {}",
                MIN_CHUNK_WORDS
            ));
        }
        if self.chunk_overlap_words >= self.min_words_per_chunk {
            return Err("chunk_overlap_words must be smaller than min_words_per_chunk".to_string());
        }
        if self.default_words_per_chunk < self.min_words_per_chunk {
            return Err("default_words_per_chunk cannot be below min_words_per_chunk".to_string());
        }
        if self.fact_batch_size == 0 || self.fact_batch_size > FACT_BATCH_SIZE {
            return Err(format!(
                "fact_batch_size must be between 1 and {}",
                FACT_BATCH_SIZE
            ));
        }
        if !(self.facts_per_1000_words.is_finite() && self.facts_per_1000_words > 0.0) {
            return Err("facts_per_1000_words must be a positive number".to_string());
        }
        if !(0.0..1.0).contains(&self.exhaustive_threshold) {
            return Err("exhaustive_threshold must be in [0, 1)".to_string());
        }
        if self.call_timeout_secs == 0 {
            return Err("call_timeout_secs must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            chunk_overlap_words: CHUNK_OVERLAP_WORDS,
            min_words_per_chunk: MIN_CHUNK_WORDS,
            default_words_per_chunk: DEFAULT_CHUNK_WORDS,
            fact_batch_size: FACT_BATCH_SIZE,
            facts_per_1000_words: FACTS_PER_1000_WORDS,
            min_facts_per_chunk: MIN_FACTS_PER_CHUNK,
            exhaustive_threshold: 1e-9,
            max_sweep_passes: 25,
            call_timeout_secs: 120,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(GeneratorConfig::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_overlap() {
        let mut config = GeneratorConfig::default();
        config.chunk_overlap_words = config.min_words_per_chunk;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_batch_size() {
        let mut config = GeneratorConfig::default();
        config.fact_batch_size = 0;
        assert!(config.validate().is_err());
        config.fact_batch_size = FACT_BATCH_SIZE + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_threshold_and_timeout() {
        let mut config = GeneratorConfig::default();
        config.exhaustive_threshold = 1.0;
        assert!(config.validate().is_err());

        let mut config = GeneratorConfig::default();
        config.call_timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = GeneratorConfig::default();
        let toml_str = config.to_toml().unwrap();
        let parsed = GeneratorConfig::from_toml(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let parsed = GeneratorConfig::from_toml("max_sweep_passes = 3\n").unwrap();
        assert_eq!(parsed.max_sweep_passes, 3);
        assert_eq!(parsed.fact_batch_size, FACT_BATCH_SIZE);
        assert_eq!(parsed.call_timeout(), Duration::from_secs(120));
    }
}
