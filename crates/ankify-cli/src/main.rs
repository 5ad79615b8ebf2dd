//! Ankify CLI - Turn study text into Anki flashcard decks.

use ankify_cli::cli::{ConfigAction, ConfigArgs};
use ankify_cli::commands;
use ankify_cli::{Cli, Command, Config, Formatter};
use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => Config::default_path()?,
    };
    // `config init --force` must be able to replace an unreadable file
    let mut config = match Config::load(Some(&config_path)) {
        Ok(config) => config,
        Err(_) if is_init(&cli.command) => Config::default(),
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to load {}", config_path.display()))
        }
    };
    config.apply_env()?;

    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        Command::Generate(args) => commands::execute_generate(args, &config, &formatter)?,
        Command::Usage(args) => commands::execute_usage(args, &config, &formatter)?,
        Command::Config(args) => {
            commands::execute_config(args, &config, &config_path, &formatter)?
        }
    }

    Ok(())
}

fn is_init(command: &Command) -> bool {
    matches!(
        command,
        Command::Config(ConfigArgs {
            action: ConfigAction::Init { .. }
        })
    )
}

/// Log to stderr; `RUST_LOG` wins unless `--verbose` is given.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
