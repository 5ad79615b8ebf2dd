//! Core Generator implementation

use crate::config::GeneratorConfig;
use crate::error::GenerationError;
use crate::types::{GenerationOutcome, GenerationRequest, Pipeline, RunState};
use crate::yield_model::{
    choose_call_size, chunk_card_target, estimate_for_words, facts_for_chunk,
};
use ankify_domain::traits::{
    CompletionProvider, DeckExporter, SubscriptionDirectory, UsageStore,
};
use ankify_domain::{Card, DeckArtifact, RunId, UsageRecord};
use ankify_extractor::{ChunkSet, Chunker, FactExtractor, FactSet};
use ankify_llm::{CompletionClient, LlmError};
use ankify_synthesizer::CardSynthesizer;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, info_span, warn, Instrument};

/// Shared handle to the subscription collaborator
pub type Subscriptions = Arc<dyn SubscriptionDirectory + Send + Sync>;

/// Turns study text into cards while keeping to the monthly cap
///
/// Every run passes a gate (subscription, credential, remaining cap) before
/// the first completion call, then runs one of two pipelines:
///
/// - **Exhaustive** (yield at the threshold or below): extract every fact,
///   then one card per fact, up to the remaining cap
/// - **Balanced**: density-driven card batches per chunk, then a bounded
///   round-robin sweep for any shortfall
///
/// The usage store is debited after every batch that added cards, so cards
/// already accepted stay counted if a later call fails.
pub struct Generator<P, U> {
    client: CompletionClient<P>,
    extractor: FactExtractor<P>,
    synthesizer: CardSynthesizer<P>,
    usage: U,
    subscriptions: Subscriptions,
    config: GeneratorConfig,
}

/// Per-run bookkeeping shared by both pipelines
struct RunContext {
    run_id: RunId,
    state: RunState,
    pipeline: Pipeline,
    target: usize,
    cards: Vec<Card>,
    // Exhaustive runs dedup across batches; balanced runs only per call
    seen: Option<HashSet<(String, String)>>,
    calls_made: usize,
    usage: UsageRecord,
}

impl RunContext {
    fn advance(&mut self, next: RunState) {
        transition(&mut self.state, next);
    }

    fn into_outcome(self, deck_title: &str) -> GenerationOutcome {
        GenerationOutcome {
            run_id: self.run_id,
            deck_title: deck_title.to_string(),
            pipeline: self.pipeline,
            target: self.target,
            cards: self.cards,
            calls_made: self.calls_made,
            usage: self.usage,
        }
    }
}

fn transition(state: &mut RunState, next: RunState) {
    if state.is_terminal() {
        return;
    }
    info!(from = %state, to = %next, "Run state transition");
    *state = next;
}

fn to_usize(n: u64) -> usize {
    usize::try_from(n).unwrap_or(usize::MAX)
}

impl<P, U> Generator<P, U>
where
    P: CompletionProvider + Send + Sync + 'static,
    P::Error: Into<LlmError>,
    U: UsageStore,
    U::Error: fmt::Display,
{
    /// Create a new Generator
    ///
    /// Fails with [`GenerationError::Config`] when `config` does not validate.
    /// The client's per-call timeout is replaced by the configured one.
    pub fn new(
        client: CompletionClient<P>,
        usage: U,
        subscriptions: Subscriptions,
        config: GeneratorConfig,
    ) -> Result<Self, GenerationError> {
        config.validate().map_err(GenerationError::Config)?;
        let client = client.with_timeout(config.call_timeout());
        Ok(Self {
            extractor: FactExtractor::new(client.clone()),
            synthesizer: CardSynthesizer::new(client.clone()),
            client,
            usage,
            subscriptions,
            config,
        })
    }

    /// Generator configuration
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Usage store the generator debits
    pub fn usage_store(&self) -> &U {
        &self.usage
    }

    /// Run gating and the selected pipeline
    pub async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationOutcome, GenerationError> {
        let run_id = RunId::new();
        let span = info_span!("generation", run_id = %run_id);

        async {
            let mut ctx = self.run(run_id, request).await?;
            ctx.advance(RunState::Done);
            Ok(ctx.into_outcome(request.deck_title()))
        }
        .instrument(span)
        .await
    }

    /// Run gating, the selected pipeline and the export step
    pub async fn generate_deck<E>(
        &self,
        request: &GenerationRequest,
        exporter: &E,
    ) -> Result<(GenerationOutcome, DeckArtifact), GenerationError>
    where
        E: DeckExporter,
        E::Error: fmt::Display,
    {
        let run_id = RunId::new();
        let span = info_span!("generation", run_id = %run_id);

        async {
            let mut ctx = self.run(run_id, request).await?;

            ctx.advance(RunState::Exporting);
            let artifact = match exporter.export(request.deck_title(), &ctx.cards) {
                Ok(artifact) => artifact,
                Err(e) => {
                    warn!("Export failed: {}", e);
                    ctx.advance(RunState::Failed);
                    return Err(GenerationError::Export(e.to_string()));
                }
            };
            info!(
                "Exported {} cards as {} ({} bytes)",
                ctx.cards.len(),
                artifact.file_name,
                artifact.bytes.len()
            );

            ctx.advance(RunState::Done);
            Ok((ctx.into_outcome(request.deck_title()), artifact))
        }
        .instrument(span)
        .await
    }

    /// Gate, then run the pipeline the yield selects
    async fn run(
        &self,
        run_id: RunId,
        request: &GenerationRequest,
    ) -> Result<RunContext, GenerationError> {
        let mut state = RunState::Idle;
        transition(&mut state, RunState::Gating);

        let usage = match self.gate(request) {
            Ok(usage) => usage,
            Err(e) => {
                warn!("Run rejected: {}", e);
                transition(&mut state, RunState::Failed);
                return Err(e);
            }
        };

        let pipeline = if request.yield_level() <= self.config.exhaustive_threshold {
            Pipeline::Exhaustive
        } else {
            Pipeline::Balanced
        };

        let mut ctx = RunContext {
            run_id,
            state,
            pipeline,
            target: 0,
            cards: Vec::new(),
            seen: match pipeline {
                Pipeline::Exhaustive => Some(HashSet::new()),
                Pipeline::Balanced => None,
            },
            calls_made: 0,
            usage,
        };
        ctx.advance(pipeline.into());

        let words_per_chunk = request
            .words_per_chunk()
            .max(self.config.min_words_per_chunk);
        let chunks = Chunker::with_overlap(words_per_chunk, self.config.chunk_overlap_words)
            .chunk(request.text());
        info!(
            "Starting {} run: {} words in {} chunks, yield {}",
            pipeline,
            chunks.total_words(),
            chunks.len(),
            request.yield_level()
        );

        let result = match pipeline {
            Pipeline::Exhaustive => self.run_exhaustive(request, &chunks, &mut ctx).await,
            Pipeline::Balanced => self.run_balanced(request, &chunks, &mut ctx).await,
        };

        if let Err(e) = result {
            warn!(
                "Run failed after {} calls and {} accepted cards: {}",
                ctx.calls_made,
                ctx.cards.len(),
                e
            );
            ctx.advance(RunState::Failed);
            return Err(e);
        }

        info!(
            "Run accepted {} of {} targeted cards in {} calls",
            ctx.cards.len(),
            ctx.target,
            ctx.calls_made
        );
        Ok(ctx)
    }

    /// Subscription, credential and cap checks; no completion calls
    fn gate(&self, request: &GenerationRequest) -> Result<UsageRecord, GenerationError> {
        if !self.subscriptions.is_active(request.email()) {
            return Err(GenerationError::SubscriptionInactive(
                request.email().to_string(),
            ));
        }

        if !self.client.has_credential() {
            return Err(GenerationError::Config(
                "OPENAI_API_KEY is not set".to_string(),
            ));
        }

        let usage = self
            .usage
            .load()
            .map_err(|e| GenerationError::Usage(e.to_string()))?;
        if usage.is_exhausted() {
            return Err(GenerationError::QuotaExhausted {
                used: usage.cards_used,
                cap: usage.cap,
            });
        }

        debug!(
            "Gate passed: {} of {} cards used this month",
            usage.cards_used, usage.cap
        );
        Ok(usage)
    }

    async fn run_exhaustive(
        &self,
        request: &GenerationRequest,
        chunks: &ChunkSet,
        ctx: &mut RunContext,
    ) -> Result<(), GenerationError> {
        let mut facts = FactSet::new();
        for chunk in chunks.iter() {
            let max_facts = facts_for_chunk(
                chunk.word_count(),
                self.config.facts_per_1000_words,
                self.config.min_facts_per_chunk,
            );
            ctx.calls_made += 1;
            self.extractor.extract(&chunk, max_facts, &mut facts).await?;
        }

        if facts.is_empty() {
            return Err(GenerationError::NoFactsExtracted);
        }

        let allowed = facts.len().min(to_usize(ctx.usage.remaining()));
        ctx.target = allowed;
        info!("{} distinct facts, {} allowed by the cap", facts.len(), allowed);

        for batch in facts.facts()[..allowed].chunks(self.config.fact_batch_size.max(1)) {
            if ctx.cards.len() >= allowed {
                break;
            }
            ctx.calls_made += 1;
            let cards = self.synthesizer.from_facts(batch, request.modes()).await?;
            self.accept(ctx, cards, allowed)?;
        }

        if ctx.cards.is_empty() {
            return Err(GenerationError::NoCardsGenerated);
        }
        Ok(())
    }

    async fn run_balanced(
        &self,
        request: &GenerationRequest,
        chunks: &ChunkSet,
        ctx: &mut RunContext,
    ) -> Result<(), GenerationError> {
        let y = request.yield_level();
        let estimate = estimate_for_words(chunks.total_words(), request.approx_cards(), y);
        let target = estimate.min(to_usize(ctx.usage.remaining()));
        ctx.target = target;

        if target == 0 {
            return Err(GenerationError::QuotaExhausted {
                used: ctx.usage.cards_used,
                cap: ctx.usage.cap,
            });
        }
        info!("Card target {} (estimate {})", target, estimate);

        for chunk in chunks.iter() {
            let chunk_target = chunk_card_target(chunk.word_count(), y);
            let mut produced = 0;

            while produced < chunk_target && ctx.cards.len() < target {
                let n = choose_call_size(y, target - ctx.cards.len(), chunk_target - produced);
                ctx.calls_made += 1;
                let cards = self
                    .synthesizer
                    .from_chunk(&chunk, n, request.modes(), y)
                    .await?;

                let accepted = self.accept(ctx, cards, target)?;
                if accepted == 0 {
                    debug!("Chunk {} stopped producing", chunk.index);
                    break;
                }
                produced += accepted;
            }
        }

        let mut passes = 0;
        while ctx.cards.len() < target && passes < self.config.max_sweep_passes {
            passes += 1;
            let mut progress = false;

            for chunk in chunks.iter() {
                if ctx.cards.len() >= target {
                    break;
                }
                let left = target - ctx.cards.len();
                let n = choose_call_size(y, left, left);
                ctx.calls_made += 1;
                let cards = self
                    .synthesizer
                    .from_chunk(&chunk, n, request.modes(), y)
                    .await?;

                if self.accept(ctx, cards, target)? > 0 {
                    progress = true;
                }
            }

            debug!("Sweep pass {}: {} of {} cards", passes, ctx.cards.len(), target);
            if !progress {
                break;
            }
        }

        if ctx.cards.is_empty() {
            return Err(GenerationError::NoCardsGenerated);
        }
        Ok(())
    }

    /// Accept cards up to `limit` and debit the store for what was accepted
    fn accept(
        &self,
        ctx: &mut RunContext,
        cards: Vec<Card>,
        limit: usize,
    ) -> Result<usize, GenerationError> {
        let mut accepted = 0;
        for card in cards {
            if ctx.cards.len() >= limit {
                break;
            }
            if let Some(seen) = ctx.seen.as_mut() {
                if !seen.insert(card.pair()) {
                    continue;
                }
            }
            ctx.cards.push(card);
            accepted += 1;
        }

        if accepted > 0 {
            ctx.usage = self
                .usage
                .debit(accepted as u64)
                .map_err(|e| GenerationError::Usage(e.to_string()))?;
            debug!(
                "Accepted {} cards; {} used of {}",
                accepted, ctx.usage.cards_used, ctx.usage.cap
            );
        }
        Ok(accepted)
    }
}
