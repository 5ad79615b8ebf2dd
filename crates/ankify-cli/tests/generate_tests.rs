//! End-to-end tests for the generate command wiring

use ankify_cli::commands::generate::{build_generator, build_request, write_deck};
use ankify_cli::config::SubscriptionEntry;
use ankify_cli::{AnkiTextExporter, Cli, Command, Config};
use ankify_generator::{GenerationError, Pipeline};
use ankify_llm::MockProvider;
use clap::Parser;
use serde_json::{json, Value};
use std::fs;
use std::path::Path;

const EMAIL: &str = "student@example.com";

fn words(n: usize) -> String {
    (0..n).map(|i| format!("w{}", i)).collect::<Vec<_>>().join(" ")
}

/// Ten distinct basic cards per call
fn cards_service() -> MockProvider {
    MockProvider::from_fn(|_, call| {
        let cards: Vec<Value> = (0..10)
            .map(|i| json!({ "front": format!("Q{}-{}", call, i), "back": "A", "mode": "recall" }))
            .collect();
        Value::Array(cards).to_string()
    })
}

fn config_in(dir: &Path, cap: u64) -> Config {
    let mut config = Config::default();
    config.email = Some(EMAIL.to_string());
    config.usage.path = Some(dir.join("adaptive_profile.json"));
    config.usage.cap = cap;
    config.subscriptions.push(SubscriptionEntry {
        email: EMAIL.to_string(),
        status: "active".to_string(),
        current_period_end: i64::MAX,
    });
    config
}

fn generate_args(extra: &[&str]) -> ankify_cli::cli::GenerateArgs {
    let mut argv = vec!["ankify", "generate", "--input", "-"];
    argv.extend_from_slice(extra);
    match Cli::parse_from(argv).command {
        Command::Generate(args) => args,
        other => panic!("unexpected command: {:?}", other),
    }
}

fn usage_file(dir: &Path) -> Value {
    let contents = fs::read_to_string(dir.join("adaptive_profile.json")).unwrap();
    serde_json::from_str(&contents).unwrap()
}

#[tokio::test]
async fn test_generate_writes_deck_and_debits_usage() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path(), 500);
    let args = generate_args(&["--yield", "1", "--approx-cards", "5", "--title", "Cell Biology"]);
    let request = build_request(&args, words(1000), &config);

    let generator = build_generator(cards_service(), &config).unwrap();
    let (outcome, artifact) = generator
        .generate_deck(&request, &AnkiTextExporter::new())
        .await
        .unwrap();

    assert_eq!(outcome.pipeline, Pipeline::Balanced);
    assert_eq!(outcome.target, 6);
    assert_eq!(outcome.cards.len(), 6);

    let path = write_deck(&artifact, &dir.path().join("decks")).unwrap();
    assert_eq!(path.file_name().unwrap(), "Cell_Biology.txt");
    let deck = fs::read_to_string(&path).unwrap();
    assert!(deck.contains("#deck:Cell Biology\n"));
    assert_eq!(deck.lines().filter(|l| l.starts_with("Basic\t")).count(), 6);

    let usage = usage_file(dir.path());
    assert_eq!(usage["cards_used"], 6);
    assert_eq!(usage["cap"], 500);
}

#[tokio::test]
async fn test_generate_rejects_unknown_subscriber() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path(), 500);
    let provider = cards_service();
    let args = generate_args(&["--email", "someone@else.com"]);
    let request = build_request(&args, words(500), &config);

    let generator = build_generator(provider.clone(), &config).unwrap();
    let result = generator.generate(&request).await;

    assert!(matches!(result, Err(GenerationError::SubscriptionInactive(_))));
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn test_generate_respects_configured_cap() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path(), 3);
    let args = generate_args(&["--yield", "1", "--approx-cards", "40"]);
    let request = build_request(&args, words(1000), &config);

    let generator = build_generator(cards_service(), &config).unwrap();
    let outcome = generator.generate(&request).await.unwrap();
    assert_eq!(outcome.cards.len(), 3);
    assert_eq!(usage_file(dir.path())["cards_used"], 3);

    let again = generator.generate(&request).await;
    assert!(matches!(
        again,
        Err(GenerationError::QuotaExhausted { used: 3, cap: 3 })
    ));
}
