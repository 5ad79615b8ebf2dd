//! CLI command definitions and argument parsing.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Ankify - Turn study text into Anki flashcard decks.
#[derive(Debug, Parser)]
#[command(name = "ankify")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (paths and numbers only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a deck from study text
    Generate(GenerateArgs),

    /// Inspect or reset the monthly usage counter
    Usage(UsageArgs),

    /// Manage the configuration file
    Config(ConfigArgs),
}

/// Arguments for the generate command.
#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Study text file, or '-' for stdin
    #[arg(short, long)]
    pub input: PathBuf,

    /// Deck title
    #[arg(short, long)]
    pub title: Option<String>,

    /// Yield level from 0.0 (every fact) to 1.0 (fewest cards)
    #[arg(short = 'y', long = "yield")]
    pub yield_level: Option<f64>,

    /// Allowed card mode; repeat for several (e.g. "cloze", "Basic Recall (Q/A)")
    #[arg(short, long = "mode")]
    pub modes: Vec<String>,

    /// Minimum number of cards for balanced runs
    #[arg(long)]
    pub approx_cards: Option<usize>,

    /// Chunk size in words
    #[arg(long)]
    pub words_per_chunk: Option<usize>,

    /// Subscriber email (defaults to the configured one)
    #[arg(short, long)]
    pub email: Option<String>,

    /// Directory the deck file is written to
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,
}

/// Arguments for the usage command.
#[derive(Debug, Args)]
pub struct UsageArgs {
    #[command(subcommand)]
    pub action: UsageAction,
}

/// Usage actions.
#[derive(Debug, Subcommand)]
pub enum UsageAction {
    /// Show this month's usage
    Show,

    /// Start this month's counter over
    Reset {
        /// New monthly cap (keeps the configured cap if omitted)
        #[arg(long)]
        cap: Option<u64>,
    },
}

/// Arguments for the config command.
#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Show the effective configuration
    Show,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}
