//! Configuration management for the CLI.
//!
//! The file lives at `~/.ankify/config.toml`. Environment variables override
//! what the file says, so a deployment can run without one.

use crate::error::{CliError, Result};
use ankify_domain::{InMemorySubscriptions, SubscriptionRecord, SubscriptionStatus};
use ankify_generator::GeneratorConfig;
use ankify_ledger::DEFAULT_MONTHLY_CAP;
use ankify_llm::openai::{API_KEY_VAR, DEFAULT_BASE_URL, DEFAULT_MODEL};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Overrides the configured model
pub const MODEL_VAR: &str = "OPENAI_MODEL";
/// Overrides the monthly card cap
pub const MONTHLY_CAP_VAR: &str = "OPENAI_MONTHLY_CAP";
/// Overrides the usage record path
pub const USAGE_PATH_VAR: &str = "ANKIFY_USAGE_PATH";
/// Overrides the completion endpoint
pub const BASE_URL_VAR: &str = "OPENAI_BASE_URL";
/// Overrides the per-call timeout
pub const CALL_TIMEOUT_VAR: &str = "ANKIFY_CALL_TIMEOUT_SECS";

const USAGE_FILE_NAME: &str = "adaptive_profile.json";

/// CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Subscriber email used when `--email` is not given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Completion service settings
    #[serde(default)]
    pub openai: OpenAiSettings,

    /// Usage ledger settings
    #[serde(default)]
    pub usage: UsageSettings,

    /// Pipeline tuning
    #[serde(default)]
    pub generation: GeneratorConfig,

    /// Display settings
    #[serde(default)]
    pub settings: Settings,

    /// Known subscriptions
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subscriptions: Vec<SubscriptionEntry>,
}

/// Completion service settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenAiSettings {
    /// API key; `OPENAI_API_KEY` takes precedence
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// OpenAI-compatible endpoint
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

/// Usage ledger settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageSettings {
    /// Usage record file; defaults to the platform data directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// Monthly card cap for fresh or unreadable records
    #[serde(default = "default_cap")]
    pub cap: u64,
}

/// One subscriber known to the local directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionEntry {
    /// Subscriber email
    pub email: String,

    /// Billing status ("active", "trialing", "past_due", ...)
    pub status: String,

    /// End of the billing period (Unix seconds)
    pub current_period_end: i64,
}

/// Global CLI settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

impl Config {
    /// Get the default configuration file path.
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".ankify").join("config.toml"))
    }

    /// Load configuration from `path` (or the default path), or defaults if
    /// the file does not exist. Environment overrides are not applied.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::default_path()?,
        };

        if path.exists() {
            let contents = fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&contents)?;
            config.generation.validate().map_err(CliError::Config)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to `path`.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = self.to_toml()?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Serialize as TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Apply environment variable overrides from the process environment.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides looked up by variable name. Blank values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        if let Some(key) = var(API_KEY_VAR) {
            self.openai.api_key = Some(key);
        }
        if let Some(model) = var(MODEL_VAR) {
            self.openai.model = model;
        }
        if let Some(url) = var(BASE_URL_VAR) {
            self.openai.base_url = url;
        }
        if let Some(path) = var(USAGE_PATH_VAR) {
            self.usage.path = Some(PathBuf::from(path));
        }
        if let Some(cap) = var(MONTHLY_CAP_VAR) {
            self.usage.cap = cap.parse().map_err(|_| {
                CliError::Config(format!("{} must be a whole number, got '{}'", MONTHLY_CAP_VAR, cap))
            })?;
        }
        if let Some(secs) = var(CALL_TIMEOUT_VAR) {
            self.generation.call_timeout_secs = secs.parse().map_err(|_| {
                CliError::Config(format!("{} must be a whole number, got '{}'", CALL_TIMEOUT_VAR, secs))
            })?;
            self.generation.validate().map_err(CliError::Config)?;
        }
        Ok(())
    }

    /// API key, or an empty string when none is configured.
    pub fn api_key(&self) -> &str {
        self.openai.api_key.as_deref().unwrap_or("")
    }

    /// Path of the usage record file.
    pub fn usage_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.usage.path {
            return Ok(path.clone());
        }
        let base = dirs::data_dir()
            .map(|dir| dir.join("ankify"))
            .or_else(|| dirs::home_dir().map(|home| home.join(".ankify")))
            .ok_or_else(|| CliError::Config("Could not find a data directory".into()))?;
        Ok(base.join(USAGE_FILE_NAME))
    }

    /// Build the subscription directory from the configured entries.
    pub fn subscription_directory(&self) -> InMemorySubscriptions {
        let mut directory = InMemorySubscriptions::new();
        for entry in &self.subscriptions {
            directory.upsert(
                &entry.email,
                SubscriptionRecord::new(
                    SubscriptionStatus::parse(&entry.status),
                    entry.current_period_end,
                ),
            );
        }
        directory
    }

    /// Copy with the API key masked, for display.
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        if let Some(key) = &config.openai.api_key {
            let tail = key
                .char_indices()
                .rev()
                .nth(3)
                .map_or(key.as_str(), |(i, _)| &key[i..]);
            config.openai.api_key = Some(format!("****{}", tail));
        }
        config
    }
}

impl Default for OpenAiSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            base_url: default_base_url(),
        }
    }
}

impl Default for UsageSettings {
    fn default() -> Self {
        Self {
            path: None,
            cap: DEFAULT_MONTHLY_CAP,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
        }
    }
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_cap() -> u64 {
    DEFAULT_MONTHLY_CAP
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}

#[cfg(test)]
mod tests {
    use super::*;
    use ankify_domain::traits::SubscriptionDirectory;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.openai.model, "gpt-4o-mini");
        assert_eq!(config.usage.cap, 50_000);
        assert_eq!(config.api_key(), "");
        assert!(config.settings.color);
        assert_eq!(config.settings.format, OutputFormat::Table);
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = Config::default();
        config.email = Some("me@example.com".into());
        config.subscriptions.push(SubscriptionEntry {
            email: "me@example.com".into(),
            status: "active".into(),
            current_period_end: 1_900_000_000,
        });

        let toml_str = config.to_toml().unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            email = "me@example.com"

            [usage]
            cap = 300
            "#,
        )
        .unwrap();
        assert_eq!(config.usage.cap, 300);
        assert_eq!(config.openai.model, "gpt-4o-mini");
        assert_eq!(config.generation, GeneratorConfig::default());
    }

    #[test]
    fn test_env_overrides_file() {
        let mut config = Config::default();
        config.openai.api_key = Some("from-file".into());

        config
            .apply_overrides(env(&[
                ("OPENAI_API_KEY", " sk-env "),
                ("OPENAI_MODEL", "gpt-4o"),
                ("OPENAI_MONTHLY_CAP", "1200"),
                ("ANKIFY_USAGE_PATH", "/tmp/usage.json"),
                ("ANKIFY_CALL_TIMEOUT_SECS", "30"),
            ]))
            .unwrap();

        assert_eq!(config.api_key(), "sk-env");
        assert_eq!(config.openai.model, "gpt-4o");
        assert_eq!(config.usage.cap, 1200);
        assert_eq!(config.usage_path().unwrap(), PathBuf::from("/tmp/usage.json"));
        assert_eq!(config.generation.call_timeout_secs, 30);
    }

    #[test]
    fn test_blank_env_values_ignored() {
        let mut config = Config::default();
        config.apply_overrides(env(&[("OPENAI_MODEL", "   ")])).unwrap();
        assert_eq!(config.openai.model, "gpt-4o-mini");
    }

    #[test]
    fn test_invalid_cap_rejected() {
        let mut config = Config::default();
        let result = config.apply_overrides(env(&[("OPENAI_MONTHLY_CAP", "lots")]));
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn test_subscription_directory() {
        let mut config = Config::default();
        config.subscriptions = vec![
            SubscriptionEntry {
                email: " Me@Example.com".into(),
                status: "trialing".into(),
                current_period_end: 2_000,
            },
            SubscriptionEntry {
                email: "gone@example.com".into(),
                status: "canceled".into(),
                current_period_end: 2_000,
            },
        ];

        let directory = config.subscription_directory();
        assert!(directory.is_active_at("me@example.com", 1_000));
        assert!(!directory.is_active_at("gone@example.com", 1_000));
        assert!(!directory.is_active_at("unknown@example.com", 1_000));
    }

    #[test]
    fn test_redacted_hides_key() {
        let mut config = Config::default();
        config.openai.api_key = Some("sk-abcdef1234".into());
        assert_eq!(config.redacted().openai.api_key.as_deref(), Some("****1234"));
        assert_eq!(config.api_key(), "sk-abcdef1234");
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.usage.cap = 77;
        config.save(&path).unwrap();

        assert_eq!(Config::load(Some(&path)).unwrap(), config);
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config, Config::default());
    }
}
