//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use ankify_domain::UsageRecord;
use ankify_generator::GenerationOutcome;
use colored::*;
use std::collections::BTreeMap;
use std::path::Path;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format a usage record.
    pub fn format_usage(&self, usage: &UsageRecord) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&usage_json(usage))?),
            OutputFormat::Quiet => Ok(usage.remaining().to_string()),
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Month", "Used", "Cap", "Remaining"]);
                builder.push_record([
                    usage.month.clone(),
                    usage.cards_used.to_string(),
                    usage.cap.to_string(),
                    self.remaining_cell(usage),
                ]);
                Ok(self.render(builder))
            }
        }
    }

    /// Format the result of a generation run written to `deck_path`.
    pub fn format_outcome(&self, outcome: &GenerationOutcome, deck_path: &Path) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let mut modes: BTreeMap<&str, usize> = BTreeMap::new();
                for card in &outcome.cards {
                    *modes.entry(card.mode.label()).or_default() += 1;
                }
                let value = serde_json::json!({
                    "run_id": outcome.run_id.to_string(),
                    "deck_title": outcome.deck_title,
                    "deck_path": deck_path.display().to_string(),
                    "pipeline": outcome.pipeline.as_str(),
                    "target": outcome.target,
                    "cards": outcome.cards.len(),
                    "cards_by_mode": modes,
                    "calls_made": outcome.calls_made,
                    "usage": usage_json(&outcome.usage),
                });
                Ok(serde_json::to_string_pretty(&value)?)
            }
            OutputFormat::Quiet => Ok(deck_path.display().to_string()),
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Field", "Value"]);
                builder.push_record(["Deck".to_string(), outcome.deck_title.clone()]);
                builder.push_record(["File".to_string(), deck_path.display().to_string()]);
                builder.push_record(["Pipeline".to_string(), outcome.pipeline.to_string()]);
                builder.push_record([
                    "Cards".to_string(),
                    format!("{} (target {})", outcome.cards.len(), outcome.target),
                ]);
                builder.push_record(["Calls".to_string(), outcome.calls_made.to_string()]);
                builder.push_record([
                    "Usage".to_string(),
                    format!("{} / {}", outcome.usage.cards_used, outcome.usage.cap),
                ]);
                Ok(self.render(builder))
            }
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Whether status messages should be printed at all.
    pub fn is_quiet(&self) -> bool {
        matches!(self.format, OutputFormat::Quiet)
    }

    /// Whether output is machine-readable JSON.
    pub fn is_json(&self) -> bool {
        matches!(self.format, OutputFormat::Json)
    }

    fn remaining_cell(&self, usage: &UsageRecord) -> String {
        let remaining = usage.remaining().to_string();
        if usage.is_exhausted() {
            self.colorize(&remaining, "red")
        } else {
            remaining
        }
    }

    fn render(&self, builder: Builder) -> String {
        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

fn usage_json(usage: &UsageRecord) -> serde_json::Value {
    serde_json::json!({
        "version": usage.version,
        "month": usage.month,
        "cards_used": usage.cards_used,
        "cap": usage.cap,
        "remaining": usage.remaining(),
    })
}
