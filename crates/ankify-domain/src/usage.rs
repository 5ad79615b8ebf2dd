//! Usage module - monthly card counter checked against a cap

/// Current schema version of the persisted usage record
pub const USAGE_SCHEMA_VERSION: u32 = 1;

/// Cards generated in one calendar month, and the cap they count against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageRecord {
    /// Schema version of the persisted form
    pub version: u32,

    /// Calendar month the counter applies to ("YYYY-MM")
    pub month: String,

    /// Cards accepted into decks this month
    pub cards_used: u64,

    /// Monthly card cap
    pub cap: u64,
}

impl UsageRecord {
    /// Fresh record for `month` with nothing used
    pub fn new(month: impl Into<String>, cap: u64) -> Self {
        Self {
            version: USAGE_SCHEMA_VERSION,
            month: month.into(),
            cards_used: 0,
            cap,
        }
    }

    /// Cards still available this month
    ///
    /// # Examples
    ///
    /// ```
    /// use ankify_domain::UsageRecord;
    ///
    /// let mut record = UsageRecord::new("2025-03", 100);
    /// record.cards_used = 130;
    /// assert_eq!(record.remaining(), 0);
    /// ```
    pub fn remaining(&self) -> u64 {
        self.cap.saturating_sub(self.cards_used)
    }

    /// Whether the cap has been reached
    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    /// Roll the record over to `month` if it belongs to another month
    ///
    /// Resets `cards_used` and keeps the cap. Returns whether anything changed.
    pub fn roll_over(&mut self, month: &str) -> bool {
        if self.month == month {
            return false;
        }
        self.month = month.to_string();
        self.cards_used = 0;
        self.version = USAGE_SCHEMA_VERSION;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remaining() {
        let mut record = UsageRecord::new("2025-03", 50);
        assert_eq!(record.remaining(), 50);
        record.cards_used = 20;
        assert_eq!(record.remaining(), 30);
        assert!(!record.is_exhausted());
        record.cards_used = 50;
        assert!(record.is_exhausted());
    }

    #[test]
    fn test_roll_over_resets_usage_and_keeps_cap() {
        let mut record = UsageRecord::new("2025-02", 75);
        record.cards_used = 60;

        assert!(record.roll_over("2025-03"));
        assert_eq!(record.month, "2025-03");
        assert_eq!(record.cards_used, 0);
        assert_eq!(record.cap, 75);
    }

    #[test]
    fn test_roll_over_same_month_is_noop() {
        let mut record = UsageRecord::new("2025-03", 75);
        record.cards_used = 10;
        assert!(!record.roll_over("2025-03"));
        assert_eq!(record.cards_used, 10);
    }
}
