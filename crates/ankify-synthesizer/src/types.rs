//! Card items as returned by the completion service

use ankify_domain::{Card, CardMode};
use serde::Deserialize;
use serde_json::Value;

/// One element of a synthesis payload
///
/// Every field is optional at the parse boundary; [`RawCard::into_card`]
/// decides what survives.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawCard {
    #[serde(default)]
    front: Option<Value>,
    #[serde(default)]
    back: Option<Value>,
    #[serde(default)]
    mode: Option<Value>,
}

impl RawCard {
    /// Parse an array element; anything that is not an object is dropped
    pub(crate) fn from_value(value: Value) -> Option<Self> {
        if !value.is_object() {
            return None;
        }
        serde_json::from_value(value).ok()
    }

    /// Normalize into a [`Card`], rejecting empty sides
    pub(crate) fn into_card(self) -> Option<Card> {
        let front = text_field(self.front)?;
        let back = text_field(self.back)?;
        let mode = text_field(self.mode)
            .map(|m| CardMode::normalize(&m))
            .unwrap_or_default();
        Card::new(&front, &back, mode)
    }
}

fn text_field(value: Option<Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s),
        _ => None,
    }
}
