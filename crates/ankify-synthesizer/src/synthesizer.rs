//! Card synthesis through the completion client

use crate::error::SynthesizerError;
use crate::prompt::{cards_from_chunk_request, cards_from_facts_request};
use crate::types::RawCard;
use ankify_domain::traits::CompletionProvider;
use ankify_domain::{Card, CardMode, Fact};
use ankify_extractor::Chunk;
use ankify_llm::{CompletionClient, LlmError};
use std::collections::HashSet;
use tracing::{debug, info};

/// Most facts sent in one cardization call
pub const FACT_BATCH_SIZE: usize = 50;

/// Phrases flashcards from facts or directly from chunks
pub struct CardSynthesizer<P> {
    client: CompletionClient<P>,
}

impl<P> CardSynthesizer<P>
where
    P: CompletionProvider + Send + Sync + 'static,
    P::Error: Into<LlmError>,
{
    /// Create a synthesizer on top of `client`
    pub fn new(client: CompletionClient<P>) -> Self {
        Self { client }
    }

    /// One card per fact, for at most [`FACT_BATCH_SIZE`] facts
    ///
    /// An empty fact list makes no call.
    pub async fn from_facts(
        &self,
        facts: &[Fact],
        modes: &[CardMode],
    ) -> Result<Vec<Card>, SynthesizerError> {
        if facts.is_empty() {
            return Ok(Vec::new());
        }

        let batch = &facts[..facts.len().min(FACT_BATCH_SIZE)];
        let parsed = self
            .client
            .complete_array(cards_from_facts_request(batch, modes))
            .await?;
        let returned = parsed.items.len();

        let cards: Vec<Card> = parsed
            .items
            .into_iter()
            .filter_map(RawCard::from_value)
            .filter_map(RawCard::into_card)
            .collect();

        debug!("{} facts sent, {} items returned, {} cards kept", batch.len(), returned, cards.len());
        Ok(cards)
    }

    /// Up to `n_cards` cards straight from `chunk`
    ///
    /// Cards repeating an earlier `(front, back)` pair of the same reply are
    /// dropped; the result is truncated to `n_cards`.
    pub async fn from_chunk(
        &self,
        chunk: &Chunk,
        n_cards: usize,
        modes: &[CardMode],
        yield_level: f64,
    ) -> Result<Vec<Card>, SynthesizerError> {
        let request = cards_from_chunk_request(&chunk.text, n_cards, modes, yield_level);
        let parsed = self.client.complete_array(request).await?;

        let mut seen = HashSet::new();
        let cards: Vec<Card> = parsed
            .items
            .into_iter()
            .filter_map(RawCard::from_value)
            .filter_map(RawCard::into_card)
            .filter(|card| seen.insert(card.pair()))
            .take(n_cards)
            .collect();

        info!("Chunk {}: asked for {}, got {} cards", chunk.index, n_cards, cards.len());
        Ok(cards)
    }
}
