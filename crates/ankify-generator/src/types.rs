//! Request and result types for generation runs

use ankify_domain::{normalize_email, normalize_modes, Card, CardMode, RunId, UsageRecord};
use ankify_extractor::{DEFAULT_CHUNK_WORDS, MIN_CHUNK_WORDS};
use std::fmt;

use crate::yield_model::clamp_yield;

/// Yield used when none (or a non-number) is given
pub const DEFAULT_YIELD: f64 = 0.6;

/// Card floor used when none is given
pub const DEFAULT_APPROX_CARDS: usize = 40;

/// Deck title used when none is given
pub const DEFAULT_DECK_TITLE: &str = "Ankify Deck";

/// Input of one generation run
///
/// Setters enforce the request invariants: yield is finite and in `[0, 1]`,
/// modes are normalized and non-empty, chunk size is at least
/// [`MIN_CHUNK_WORDS`].
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    email: String,
    deck_title: String,
    text: String,
    yield_level: f64,
    modes: Vec<CardMode>,
    approx_cards: usize,
    words_per_chunk: usize,
}

impl GenerationRequest {
    /// Request for `text` with every other field at its default
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            email: String::new(),
            deck_title: DEFAULT_DECK_TITLE.to_string(),
            text: text.into(),
            yield_level: DEFAULT_YIELD,
            modes: vec![CardMode::BasicRecall],
            approx_cards: DEFAULT_APPROX_CARDS,
            words_per_chunk: DEFAULT_CHUNK_WORDS,
        }
    }

    /// Subscriber the run is billed to; trimmed and lower-cased
    pub fn with_email(mut self, email: &str) -> Self {
        self.email = normalize_email(email);
        self
    }

    /// Deck title; blank titles keep the default
    pub fn with_deck_title(mut self, title: &str) -> Self {
        let title = title.trim();
        if !title.is_empty() {
            self.deck_title = title.to_string();
        }
        self
    }

    /// Yield level; non-finite values use [`DEFAULT_YIELD`]
    pub fn with_yield(mut self, yield_level: f64) -> Self {
        let y = if yield_level.is_finite() {
            yield_level
        } else {
            DEFAULT_YIELD
        };
        self.yield_level = clamp_yield(y);
        self
    }

    /// Allowed card modes, by label or alias
    pub fn with_modes<S: AsRef<str>>(mut self, modes: &[S]) -> Self {
        self.modes = normalize_modes(modes);
        self
    }

    /// Card floor for the balanced pipeline
    pub fn with_approx_cards(mut self, approx_cards: usize) -> Self {
        self.approx_cards = approx_cards;
        self
    }

    /// Chunk size in words; raised to [`MIN_CHUNK_WORDS`] if smaller
    pub fn with_words_per_chunk(mut self, words_per_chunk: usize) -> Self {
        self.words_per_chunk = words_per_chunk.max(MIN_CHUNK_WORDS);
        self
    }

    /// Normalized subscriber email
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Deck title
    pub fn deck_title(&self) -> &str {
        &self.deck_title
    }

    /// Raw study text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Yield level in `[0, 1]`
    pub fn yield_level(&self) -> f64 {
        self.yield_level
    }

    /// Allowed modes, non-empty
    pub fn modes(&self) -> &[CardMode] {
        &self.modes
    }

    /// Card floor
    pub fn approx_cards(&self) -> usize {
        self.approx_cards
    }

    /// Chunk size in words
    pub fn words_per_chunk(&self) -> usize {
        self.words_per_chunk
    }
}

/// Which pipeline a run used
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pipeline {
    /// Extract every fact, then one card per fact
    Exhaustive,
    /// Density-driven card batches straight from chunks
    Balanced,
}

impl Pipeline {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Pipeline::Exhaustive => "exhaustive",
            Pipeline::Balanced => "balanced",
        }
    }
}

impl fmt::Display for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle of a generation run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Created, nothing checked yet
    Idle,
    /// Checking subscription, credential and remaining cap
    Gating,
    /// Running the exhaustive pipeline
    ExhaustivePipeline,
    /// Running the balanced pipeline
    BalancedPipeline,
    /// Handing cards to the exporter
    Exporting,
    /// Finished successfully
    Done,
    /// Aborted
    Failed,
}

impl RunState {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            RunState::Idle => "idle",
            RunState::Gating => "gating",
            RunState::ExhaustivePipeline => "exhaustive_pipeline",
            RunState::BalancedPipeline => "balanced_pipeline",
            RunState::Exporting => "exporting",
            RunState::Done => "done",
            RunState::Failed => "failed",
        }
    }

    /// Whether the run can no longer change state
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunState::Done | RunState::Failed)
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Pipeline> for RunState {
    fn from(pipeline: Pipeline) -> Self {
        match pipeline {
            Pipeline::Exhaustive => RunState::ExhaustivePipeline,
            Pipeline::Balanced => RunState::BalancedPipeline,
        }
    }
}

/// Result of a successful run
#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    /// Run identifier (UUIDv7)
    pub run_id: RunId,
    /// Deck title
    pub deck_title: String,
    /// Pipeline that produced the cards
    pub pipeline: Pipeline,
    /// Card target the run worked toward
    pub target: usize,
    /// Accepted cards, in acceptance order
    pub cards: Vec<Card>,
    /// Completion calls made
    pub calls_made: usize,
    /// Usage record after the last debit
    pub usage: UsageRecord,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults() {
        let request = GenerationRequest::new("text");
        assert_eq!(request.yield_level(), DEFAULT_YIELD);
        assert_eq!(request.approx_cards(), DEFAULT_APPROX_CARDS);
        assert_eq!(request.words_per_chunk(), DEFAULT_CHUNK_WORDS);
        assert_eq!(request.modes(), &[CardMode::BasicRecall]);
        assert_eq!(request.deck_title(), DEFAULT_DECK_TITLE);
    }

    #[test]
    fn test_request_sanitizes_inputs() {
        let request = GenerationRequest::new("text")
            .with_email("  Student@Example.COM ")
            .with_deck_title("   ")
            .with_yield(3.5)
            .with_modes(&["cloze", "nonsense", "Fill in the Blank"])
            .with_words_per_chunk(10);

        assert_eq!(request.email(), "student@example.com");
        assert_eq!(request.deck_title(), DEFAULT_DECK_TITLE);
        assert_eq!(request.yield_level(), 1.0);
        assert_eq!(request.modes(), &[CardMode::FillInBlank, CardMode::BasicRecall]);
        assert_eq!(request.words_per_chunk(), MIN_CHUNK_WORDS);
    }

    #[test]
    fn test_non_finite_yield_uses_default() {
        assert_eq!(GenerationRequest::new("t").with_yield(f64::NAN).yield_level(), DEFAULT_YIELD);
        assert_eq!(GenerationRequest::new("t").with_yield(f64::INFINITY).yield_level(), DEFAULT_YIELD);
        assert_eq!(GenerationRequest::new("t").with_yield(-0.5).yield_level(), 0.0);
    }

    #[test]
    fn test_empty_modes_default_to_basic() {
        let request = GenerationRequest::new("t").with_modes::<&str>(&[]);
        assert_eq!(request.modes(), &[CardMode::BasicRecall]);
    }

    #[test]
    fn test_run_state_from_pipeline() {
        assert_eq!(RunState::from(Pipeline::Exhaustive), RunState::ExhaustivePipeline);
        assert!(RunState::Failed.is_terminal());
        assert!(!RunState::Gating.is_terminal());
    }
}
