//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the generation pipeline and
//! infrastructure. Implementations live in other crates.

use crate::{Card, CompletionRequest, SubscriptionRecord, UsageRecord};
use std::time::{SystemTime, UNIX_EPOCH};

/// Trait for text-completion providers
///
/// Implemented by the infrastructure layer (ankify-llm)
pub trait CompletionProvider {
    /// Error type for completion calls
    type Error;

    /// Send one request and return the raw text payload
    fn complete(&self, request: &CompletionRequest) -> Result<String, Self::Error>;

    /// Whether a credential for the service is configured
    fn has_credential(&self) -> bool {
        true
    }

    /// Model identifier used for requests
    fn model_name(&self) -> &str;
}

/// Trait for the monthly usage counter
///
/// Implemented by the infrastructure layer (ankify-ledger)
pub trait UsageStore {
    /// Error type for store operations
    type Error;

    /// Current record, rolled over to the current month and self-healed
    fn load(&self) -> Result<UsageRecord, Self::Error>;

    /// Validate and persist `record`
    fn save(&self, record: &UsageRecord) -> Result<(), Self::Error>;

    /// Reinitialize for the current month, optionally overriding the cap
    fn reset(&self, cap: Option<u64>) -> Result<UsageRecord, Self::Error>;

    /// Add `cards` to this month's counter as one read-modify-write
    fn debit(&self, cards: u64) -> Result<UsageRecord, Self::Error>;
}

/// Trait for the subscription collaborator
pub trait SubscriptionDirectory {
    /// Last known subscription state for `email`
    fn lookup(&self, email: &str) -> Option<SubscriptionRecord>;

    /// Whether `email` has a usable subscription at `now` (Unix seconds)
    fn is_active_at(&self, email: &str, now: i64) -> bool {
        self.lookup(email)
            .map(|record| record.is_active_at(now))
            .unwrap_or(false)
    }

    /// Whether `email` has a usable subscription right now
    fn is_active(&self, email: &str) -> bool {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0);
        self.is_active_at(email, now)
    }
}

/// A rendered deck ready for download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckArtifact {
    /// Suggested file name
    pub file_name: String,

    /// File contents
    pub bytes: Vec<u8>,
}

/// Trait for deck exporters
///
/// Exporters must provide two templates: a two-field question/answer
/// template, and a cloze template whose text field already carries the
/// deletion markup (see [`crate::CardTemplate`]).
pub trait DeckExporter {
    /// Error type for export operations
    type Error;

    /// Render `cards`, in order, into a deck titled `title`
    fn export(&self, title: &str, cards: &[Card]) -> Result<DeckArtifact, Self::Error>;
}
