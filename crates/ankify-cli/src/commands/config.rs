//! Config command implementation.

use crate::cli::{ConfigAction, ConfigArgs};
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use std::path::Path;

/// Execute the config command.
///
/// `config` is the effective configuration (file plus environment);
/// `path` is the file `init` writes.
pub fn execute_config(
    args: ConfigArgs,
    config: &Config,
    path: &Path,
    formatter: &Formatter,
) -> Result<()> {
    match args.action {
        ConfigAction::Init { force } => init_config(path, force, formatter),
        ConfigAction::Show => show_config(config, formatter),
    }
}

/// Write a default configuration file.
fn init_config(path: &Path, force: bool, formatter: &Formatter) -> Result<()> {
    if path.exists() && !force {
        return Err(CliError::InvalidInput(format!(
            "{} already exists; use --force to overwrite",
            path.display()
        )));
    }

    Config::default().save(path)?;
    println!(
        "{}",
        formatter.success(&format!("Wrote default configuration to {}", path.display()))
    );
    if !formatter.is_quiet() {
        println!(
            "{}",
            formatter.info("Add a [[subscriptions]] entry and set OPENAI_API_KEY before generating")
        );
    }
    Ok(())
}

/// Print the effective configuration with the API key masked.
fn show_config(config: &Config, formatter: &Formatter) -> Result<()> {
    let redacted = config.redacted();
    if formatter.is_json() {
        println!("{}", serde_json::to_string_pretty(&redacted)?);
    } else {
        print!("{}", redacted.to_toml()?);
    }
    Ok(())
}
