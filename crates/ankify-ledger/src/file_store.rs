//! File-backed usage store

use crate::heal::{current_month, heal, render, UsageFile};
use crate::LedgerError;
use ankify_domain::traits::UsageStore;
use ankify_domain::UsageRecord;
use serde_json::Value;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Default monthly cap when neither the file nor the caller sets one
pub const DEFAULT_MONTHLY_CAP: u64 = 50_000;

/// Usage record kept in a pretty-printed JSON file
///
/// Every operation holds an exclusive advisory lock on `<path>.lock` for its
/// whole read-modify-write, so concurrent processes never lose an update.
/// Writes go to a temporary file in the same directory which then replaces
/// the record.
#[derive(Debug, Clone)]
pub struct FileUsageStore {
    path: PathBuf,
    default_cap: u64,
}

/// Held for the duration of one store operation; dropping releases the lock
struct LockGuard {
    _file: File,
}

impl FileUsageStore {
    /// Create a store for the record at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_default_cap(path, DEFAULT_MONTHLY_CAP)
    }

    /// Create a store whose fresh records use `default_cap`
    pub fn with_default_cap(path: impl Into<PathBuf>, default_cap: u64) -> Self {
        Self {
            path: path.into(),
            default_cap,
        }
    }

    /// Location of the record
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Cap used for fresh or unreadable records
    pub fn default_cap(&self) -> u64 {
        self.default_cap
    }

    fn lock_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".lock");
        PathBuf::from(name)
    }

    fn ensure_dir(&self) -> Result<(), LedgerError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        Ok(())
    }

    fn lock(&self) -> Result<LockGuard, LedgerError> {
        self.ensure_dir()?;
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(self.lock_path())?;
        file.lock()?;
        Ok(LockGuard { _file: file })
    }

    /// Read, heal and if needed rewrite the record; caller holds the lock
    fn load_locked(&self) -> Result<UsageRecord, LedgerError> {
        let month = current_month();

        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("No usage record at {}, creating one", self.path.display());
                let record = UsageRecord::new(month, self.default_cap);
                self.write_locked(&record)?;
                return Ok(record);
            }
            Err(e) => return Err(e.into()),
        };

        let raw: Value = serde_json::from_str(&contents).unwrap_or_else(|e| {
            warn!("Unreadable usage record at {}: {}", self.path.display(), e);
            Value::Null
        });

        // Layout differences count; the file is left in canonical form
        let record = heal(&raw, &month, self.default_cap);
        let canonical = render(&record)?;
        if contents != canonical {
            debug!("Usage record healed, rolled over or reformatted, rewriting");
            self.write_text(&canonical)?;
        }
        Ok(record)
    }

    /// Atomically replace the record; caller holds the lock
    fn write_locked(&self, record: &UsageRecord) -> Result<(), LedgerError> {
        self.write_text(&render(record)?)
    }

    fn write_text(&self, json: &str) -> Result<(), LedgerError> {
        self.ensure_dir()?;
        let dir = match self.path.parent() {
            Some(d) if !d.as_os_str().is_empty() => d.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let mut tmp = tempfile::Builder::new()
            .prefix("usage_")
            .suffix(".json")
            .tempfile_in(&dir)?;
        tmp.write_all(json.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| LedgerError::Io(e.error))?;
        Ok(())
    }
}

impl UsageStore for FileUsageStore {
    type Error = LedgerError;

    fn load(&self) -> Result<UsageRecord, Self::Error> {
        let _guard = self.lock()?;
        self.load_locked()
    }

    fn save(&self, record: &UsageRecord) -> Result<(), Self::Error> {
        let _guard = self.lock()?;
        let raw = serde_json::to_value(UsageFile::from(record))?;
        let healed = heal(&raw, &current_month(), self.default_cap);
        self.write_locked(&healed)
    }

    fn reset(&self, cap: Option<u64>) -> Result<UsageRecord, Self::Error> {
        let _guard = self.lock()?;
        let record = UsageRecord::new(current_month(), cap.unwrap_or(self.default_cap));
        self.write_locked(&record)?;
        info!("Usage reset for {} with cap {}", record.month, record.cap);
        Ok(record)
    }

    fn debit(&self, cards: u64) -> Result<UsageRecord, Self::Error> {
        let _guard = self.lock()?;
        let mut record = self.load_locked()?;
        record.cards_used = record.cards_used.saturating_add(cards);
        self.write_locked(&record)?;
        debug!("Debited {} cards, {} used of {}", cards, record.cards_used, record.cap);
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock_path_is_sidecar() {
        let store = FileUsageStore::new("/data/adaptive_profile.json");
        assert_eq!(store.lock_path(), PathBuf::from("/data/adaptive_profile.json.lock"));
        assert_eq!(store.default_cap(), DEFAULT_MONTHLY_CAP);
    }
}
