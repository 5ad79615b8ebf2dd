//! Ankify Extractor
//!
//! Turns raw study text into chunks and chunks into atomic facts.
//!
//! # Architecture
//!
//! ```text
//! Text → normalize → Chunker → FactExtractor → LLM → FactSet
//! ```
//!
//! # Key Features
//!
//! - **Normalization**: citation markers stripped, whitespace collapsed
//! - **Chunking**: overlapping word windows, built lazily
//! - **Fact Extraction**: one completion call per chunk
//! - **Deduplication**: facts keyed case- and trailing-period-insensitively
//!   across every chunk of a run
//!
//! # Example Usage
//!
//! ```no_run
//! use ankify_extractor::{Chunker, FactExtractor, FactSet};
//! use ankify_llm::{CompletionClient, MockProvider};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let extractor = FactExtractor::new(CompletionClient::new(MockProvider::new("[]")));
//! let chunks = Chunker::default().chunk("Some long study text ...");
//!
//! let mut facts = FactSet::new();
//! for chunk in chunks.iter() {
//!     extractor.extract(&chunk, 40, &mut facts).await?;
//! }
//! println!("{} distinct facts", facts.len());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod chunking;
mod error;
mod facts;
mod normalize;
mod prompt;

pub use chunking::{
    Chunk, ChunkIter, ChunkSet, Chunker, CHUNK_OVERLAP_WORDS, DEFAULT_CHUNK_WORDS,
    MIN_CHUNK_WORDS,
};
pub use error::ExtractorError;
pub use facts::{FactExtractor, FactSet};
pub use normalize::{fact_key, normalize_text, word_count};
pub use prompt::{extraction_request, EXTRACTION_MAX_TOKENS, EXTRACTION_TEMPERATURE};
