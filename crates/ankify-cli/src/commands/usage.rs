//! Usage command implementation.

use crate::cli::{UsageAction, UsageArgs};
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use ankify_domain::traits::UsageStore;
use ankify_ledger::FileUsageStore;

/// Execute the usage command.
pub fn execute_usage(args: UsageArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let store = usage_store(config)?;

    match args.action {
        UsageAction::Show => {
            let record = store.load()?;
            println!("{}", formatter.format_usage(&record)?);
            if record.is_exhausted() && !formatter.is_quiet() && !formatter.is_json() {
                println!("{}", formatter.warning("Monthly card limit reached"));
            }
        }
        UsageAction::Reset { cap } => {
            let record = store.reset(cap)?;
            if !formatter.is_quiet() && !formatter.is_json() {
                println!(
                    "{}",
                    formatter.success(&format!(
                        "Usage reset for {} (cap {})",
                        record.month, record.cap
                    ))
                );
            }
            println!("{}", formatter.format_usage(&record)?);
        }
    }

    Ok(())
}

/// File-backed usage store at the configured path.
pub fn usage_store(config: &Config) -> Result<FileUsageStore> {
    Ok(FileUsageStore::with_default_cap(
        config.usage_path()?,
        config.usage.cap,
    ))
}
