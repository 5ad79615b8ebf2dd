//! Ankify CLI library.
//!
//! This library provides the core functionality for the `ankify` command-line
//! interface, including configuration management, command execution, deck
//! export and output formatting.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod export;
pub mod output;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use export::AnkiTextExporter;
pub use output::Formatter;
