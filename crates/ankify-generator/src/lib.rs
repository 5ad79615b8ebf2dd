//! Ankify Generator
//!
//! Orchestrates a generation run: gating, pipeline selection by yield, sized
//! and repeated completion calls, card deduplication, incremental debiting of
//! the usage ledger and the final hand-off to a deck exporter.
//!
//! # Architecture
//!
//! ```text
//! Request → Gate → ┬ Exhaustive: Chunker → FactExtractor → CardSynthesizer::from_facts
//!                  └ Balanced:   Chunker → CardSynthesizer::from_chunk (+ sweep)
//!                  → UsageStore::debit per batch → DeckExporter
//! ```
//!
//! # Example Usage
//!
//! ```no_run
//! use ankify_domain::{InMemorySubscriptions, SubscriptionRecord, SubscriptionStatus};
//! use ankify_generator::{GenerationRequest, Generator, GeneratorConfig};
//! use ankify_ledger::InMemoryUsageStore;
//! use ankify_llm::{CompletionClient, MockProvider};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut subscriptions = InMemorySubscriptions::new();
//! subscriptions.upsert(
//!     "you@example.com",
//!     SubscriptionRecord::new(SubscriptionStatus::Active, i64::MAX),
//! );
//!
//! let generator = Generator::new(
//!     CompletionClient::new(MockProvider::new("[]")),
//!     InMemoryUsageStore::new(500),
//!     Arc::new(subscriptions),
//!     GeneratorConfig::default(),
//! )?;
//!
//! let request = GenerationRequest::new("Paste your study text here...")
//!     .with_email("you@example.com")
//!     .with_yield(0.6);
//! let outcome = generator.generate(&request).await?;
//! println!("{} cards", outcome.cards.len());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod generator;
mod types;
pub mod yield_model;


pub use config::GeneratorConfig;
pub use error::GenerationError;
pub use generator::{Generator, Subscriptions};
pub use types::{
    GenerationOutcome, GenerationRequest, Pipeline, RunState, DEFAULT_APPROX_CARDS,
    DEFAULT_DECK_TITLE, DEFAULT_YIELD,
};
