//! Ankify Synthesizer
//!
//! Phrases flashcards through the completion client, either one card per
//! extracted fact or a sized batch straight from a chunk of study text.
//!
//! Returned items are normalized on the spot: mode strings map to
//! [`CardMode`](ankify_domain::CardMode), items without both sides are
//! dropped, and fill-in-the-blank fronts are passed through as given.

#![warn(missing_docs)]

mod error;
mod prompt;
mod synthesizer;
mod types;

pub use error::SynthesizerError;
pub use prompt::{
    cards_from_chunk_request, cards_from_facts_request, BANNED_STEMS, SYNTHESIS_MAX_TOKENS,
    SYNTHESIS_TEMPERATURE,
};
pub use synthesizer::{CardSynthesizer, FACT_BATCH_SIZE};
