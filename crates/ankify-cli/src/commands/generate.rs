//! Generate command implementation.

use crate::cli::GenerateArgs;
use crate::commands::usage::usage_store;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::export::AnkiTextExporter;
use crate::output::Formatter;
use ankify_domain::traits::CompletionProvider;
use ankify_domain::DeckArtifact;
use ankify_generator::{GenerationRequest, Generator};
use ankify_ledger::FileUsageStore;
use ankify_llm::{CompletionClient, LlmError, OpenAiProvider};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Execute the generate command.
///
/// The OpenAI provider wraps a blocking HTTP client, which must be created
/// and dropped outside the async runtime; only the run itself is driven by
/// `block_on`.
pub fn execute_generate(args: GenerateArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let text = read_input(&args.input)?;
    let request = build_request(&args, text, config);

    let provider = OpenAiProvider::with_timeout(
        config.api_key(),
        config.openai.model.as_str(),
        config.generation.call_timeout(),
    )?
    .with_base_url(config.openai.base_url.as_str());
    let generator = build_generator(provider, config)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let (outcome, artifact) =
        runtime.block_on(generator.generate_deck(&request, &AnkiTextExporter::new()))?;

    let path = write_deck(&artifact, &args.output)?;
    info!("Deck written to {}", path.display());

    println!("{}", formatter.format_outcome(&outcome, &path)?);
    if !formatter.is_quiet() && !formatter.is_json() && outcome.cards.len() < outcome.target {
        println!(
            "{}",
            formatter.warning(&format!(
                "Only {} of {} cards generated",
                outcome.cards.len(),
                outcome.target
            ))
        );
    }
    Ok(())
}

/// Read study text from a file, or from stdin when `input` is `-`.
pub fn read_input(input: &Path) -> Result<String> {
    let text = if input == Path::new("-") {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        fs::read_to_string(input).map_err(|e| {
            CliError::InvalidInput(format!("Cannot read {}: {}", input.display(), e))
        })?
    };

    if text.trim().is_empty() {
        return Err(CliError::InvalidInput("Input text is empty".into()));
    }
    Ok(text)
}

/// Build the generation request from arguments, falling back to config.
pub fn build_request(args: &GenerateArgs, text: String, config: &Config) -> GenerationRequest {
    let mut request = GenerationRequest::new(text)
        .with_words_per_chunk(
            args.words_per_chunk
                .unwrap_or(config.generation.default_words_per_chunk),
        );

    if let Some(email) = args.email.as_deref().or(config.email.as_deref()) {
        request = request.with_email(email);
    }
    if let Some(title) = &args.title {
        request = request.with_deck_title(title);
    }
    if let Some(yield_level) = args.yield_level {
        request = request.with_yield(yield_level);
    }
    if !args.modes.is_empty() {
        request = request.with_modes(&args.modes);
    }
    if let Some(approx_cards) = args.approx_cards {
        request = request.with_approx_cards(approx_cards);
    }
    request
}

/// Wire a generator around `provider` with the configured ledger and
/// subscriptions.
pub fn build_generator<P>(provider: P, config: &Config) -> Result<Generator<P, FileUsageStore>>
where
    P: CompletionProvider + Send + Sync + 'static,
    P::Error: Into<LlmError>,
{
    Ok(Generator::new(
        CompletionClient::new(provider),
        usage_store(config)?,
        Arc::new(config.subscription_directory()),
        config.generation.clone(),
    )?)
}

/// Write a deck artifact into `dir`, creating it if needed.
pub fn write_deck(artifact: &DeckArtifact, dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(&artifact.file_name);
    fs::write(&path, &artifact.bytes)?;
    Ok(path)
}
