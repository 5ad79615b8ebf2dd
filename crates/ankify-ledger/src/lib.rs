//! Ankify Usage Ledger
//!
//! Implements the `UsageStore` trait: a monthly card counter checked against
//! a cap, debited as cards are accepted.
//!
//! # Architecture
//!
//! - [`FileUsageStore`]: JSON record on disk, locked and atomically replaced
//! - [`InMemoryUsageStore`]: same semantics without persistence
//!
//! Loading always rolls the record over to the current UTC month and repairs
//! anything malformed before handing it out.
//!
//! # Examples
//!
//! ```no_run
//! use ankify_domain::traits::UsageStore;
//! use ankify_ledger::FileUsageStore;
//!
//! let store = FileUsageStore::new("data/adaptive_profile.json");
//! let record = store.load().unwrap();
//! println!("{} of {} cards used", record.cards_used, record.cap);
//! ```

#![warn(missing_docs)]

mod file_store;
mod heal;
mod memory_store;

use thiserror::Error;

pub use file_store::{FileUsageStore, DEFAULT_MONTHLY_CAP};
pub use heal::{current_month, heal};
pub use memory_store::InMemoryUsageStore;

/// Errors that can occur during ledger operations
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Record could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
