//! In-memory usage store

use crate::heal::current_month;
use crate::LedgerError;
use ankify_domain::traits::UsageStore;
use ankify_domain::UsageRecord;
use std::sync::{Mutex, PoisonError};

/// Usage record held in memory, for tests and embedding
#[derive(Debug)]
pub struct InMemoryUsageStore {
    record: Mutex<UsageRecord>,
    default_cap: u64,
}

impl InMemoryUsageStore {
    /// Fresh record for the current month with `cap`
    pub fn new(cap: u64) -> Self {
        Self::from_record(UsageRecord::new(current_month(), cap))
    }

    /// Start from an existing record
    pub fn from_record(record: UsageRecord) -> Self {
        let default_cap = record.cap;
        Self {
            record: Mutex::new(record),
            default_cap,
        }
    }

    /// Copy of the record as stored, without rollover
    pub fn snapshot(&self) -> UsageRecord {
        self.record
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn with_record<T>(&self, f: impl FnOnce(&mut UsageRecord) -> T) -> T {
        let mut record = self.record.lock().unwrap_or_else(PoisonError::into_inner);
        record.roll_over(&current_month());
        f(&mut record)
    }
}

impl UsageStore for InMemoryUsageStore {
    type Error = LedgerError;

    fn load(&self) -> Result<UsageRecord, Self::Error> {
        Ok(self.with_record(|record| record.clone()))
    }

    fn save(&self, record: &UsageRecord) -> Result<(), Self::Error> {
        let mut stored = record.clone();
        stored.roll_over(&current_month());
        *self.record.lock().unwrap_or_else(PoisonError::into_inner) = stored;
        Ok(())
    }

    fn reset(&self, cap: Option<u64>) -> Result<UsageRecord, Self::Error> {
        let fresh = UsageRecord::new(current_month(), cap.unwrap_or(self.default_cap));
        Ok(self.with_record(|record| {
            *record = fresh;
            record.clone()
        }))
    }

    fn debit(&self, cards: u64) -> Result<UsageRecord, Self::Error> {
        Ok(self.with_record(|record| {
            record.cards_used = record.cards_used.saturating_add(cards);
            record.clone()
        }))
    }
}
