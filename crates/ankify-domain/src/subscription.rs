//! Subscription state as reported by the billing collaborator

use crate::traits::SubscriptionDirectory;
use std::collections::HashMap;

/// Billing status of a subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubscriptionStatus {
    /// Paid and current
    Active,
    /// In a trial period
    Trialing,
    /// Payment overdue
    PastDue,
    /// Cancelled by the customer or the provider
    Canceled,
    /// Checkout started but never completed
    Incomplete,
    /// Payment attempts exhausted
    Unpaid,
    /// Anything the billing provider reports that we do not know
    Unknown,
}

impl SubscriptionStatus {
    /// Parse a status string as reported by the billing provider
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "active" => SubscriptionStatus::Active,
            "trialing" => SubscriptionStatus::Trialing,
            "past_due" => SubscriptionStatus::PastDue,
            "canceled" | "cancelled" => SubscriptionStatus::Canceled,
            "incomplete" => SubscriptionStatus::Incomplete,
            "unpaid" => SubscriptionStatus::Unpaid,
            _ => SubscriptionStatus::Unknown,
        }
    }

    /// Status name in the billing provider's vocabulary
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::Trialing => "trialing",
            SubscriptionStatus::PastDue => "past_due",
            SubscriptionStatus::Canceled => "canceled",
            SubscriptionStatus::Incomplete => "incomplete",
            SubscriptionStatus::Unpaid => "unpaid",
            SubscriptionStatus::Unknown => "unknown",
        }
    }

    /// Whether this status grants access while inside its billing period
    pub fn grants_access(&self) -> bool {
        matches!(self, SubscriptionStatus::Active | SubscriptionStatus::Trialing)
    }
}

/// Last known subscription state for one customer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionRecord {
    /// Billing status
    pub status: SubscriptionStatus,

    /// End of the current billing period (Unix seconds)
    pub current_period_end: i64,
}

impl SubscriptionRecord {
    /// Create a record
    pub fn new(status: SubscriptionStatus, current_period_end: i64) -> Self {
        Self {
            status,
            current_period_end,
        }
    }

    /// Whether the subscription is usable at `now` (Unix seconds)
    ///
    /// # Examples
    ///
    /// ```
    /// use ankify_domain::{SubscriptionRecord, SubscriptionStatus};
    ///
    /// let record = SubscriptionRecord::new(SubscriptionStatus::Trialing, 2_000);
    /// assert!(record.is_active_at(1_999));
    /// assert!(record.is_active_at(2_000));
    /// assert!(!record.is_active_at(2_001));
    /// ```
    pub fn is_active_at(&self, now: i64) -> bool {
        self.status.grants_access() && self.current_period_end >= now
    }
}

/// Normalize an email address for lookups
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Subscription directory held in memory, keyed by normalized email
#[derive(Debug, Clone, Default)]
pub struct InMemorySubscriptions {
    records: HashMap<String, SubscriptionRecord>,
}

impl InMemorySubscriptions {
    /// Create an empty directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the record for `email`
    pub fn upsert(&mut self, email: &str, record: SubscriptionRecord) {
        self.records.insert(normalize_email(email), record);
    }

    /// Number of known customers
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the directory is empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl SubscriptionDirectory for InMemorySubscriptions {
    fn lookup(&self, email: &str) -> Option<SubscriptionRecord> {
        self.records.get(&normalize_email(email)).cloned()
    }
}
