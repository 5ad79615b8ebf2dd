//! Validation and repair of persisted usage records

use ankify_domain::{UsageRecord, USAGE_SCHEMA_VERSION};
use serde::Serialize;
use serde_json::Value;

/// Persisted form of a [`UsageRecord`]; field order is the file order
#[derive(Debug, Serialize)]
pub(crate) struct UsageFile<'a> {
    version: u32,
    month: &'a str,
    cards_used: u64,
    cap: u64,
}

impl<'a> From<&'a UsageRecord> for UsageFile<'a> {
    fn from(record: &'a UsageRecord) -> Self {
        Self {
            version: record.version,
            month: &record.month,
            cards_used: record.cards_used,
            cap: record.cap,
        }
    }
}

/// Current calendar month in UTC, as `YYYY-MM`
pub fn current_month() -> String {
    chrono::Utc::now().format("%Y-%m").to_string()
}

/// Rebuild a valid record for `month` from whatever was read
///
/// Unknown keys are ignored, a record from another month starts over at
/// zero, counters that cannot be read as integers fall back to defaults and
/// negative counters become zero.
pub fn heal(raw: &Value, month: &str, default_cap: u64) -> UsageRecord {
    let Some(fields) = raw.as_object() else {
        return UsageRecord::new(month, default_cap);
    };

    let same_month = fields.get("month").and_then(Value::as_str) == Some(month);

    let cards_used = if same_month {
        fields.get("cards_used").and_then(coerce_int).map_or(0, clamp_non_negative)
    } else {
        0
    };

    let cap = match fields.get("cap") {
        None => default_cap,
        Some(value) => coerce_int(value).map_or(default_cap, clamp_non_negative),
    };

    UsageRecord {
        version: USAGE_SCHEMA_VERSION,
        month: month.to_string(),
        cards_used,
        cap,
    }
}

/// Canonical file text for `record`
pub(crate) fn render(record: &UsageRecord) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&UsageFile::from(record))
}

fn coerce_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_u64().map(|u| i64::try_from(u).unwrap_or(i64::MAX)))
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    }
}

fn clamp_non_negative(n: i64) -> u64 {
    u64::try_from(n).unwrap_or(0)
}
