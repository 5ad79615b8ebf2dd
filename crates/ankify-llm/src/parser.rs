//! Recover a JSON array from a completion payload
//!
//! Models are told to answer with a bare JSON array but regularly wrap it in
//! prose or a markdown code fence. Two strategies are tried in order:
//! a strict parse of the whole payload, then a parse of the slice between the
//! first `[` and the last `]`.

use crate::LlmError;
use serde_json::Value;
use tracing::debug;

/// Which strategy produced the array
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStrategy {
    /// The payload itself was a JSON array
    Strict,
    /// The array was sliced out of surrounding text
    BracketSlice,
}

/// A JSON array recovered from a payload
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedArray {
    /// Array elements, in order
    pub items: Vec<Value>,
    /// Strategy that succeeded
    pub strategy: ParseStrategy,
}

/// Parse `payload` as a JSON array, tolerating text around it
pub fn parse_json_array(payload: &str) -> Result<ParsedArray, LlmError> {
    let strict_error = match serde_json::from_str::<Value>(payload.trim()) {
        Ok(Value::Array(items)) => {
            return Ok(ParsedArray {
                items,
                strategy: ParseStrategy::Strict,
            })
        }
        Ok(other) => format!("expected a JSON array, got {}", json_kind(&other)),
        Err(e) => e.to_string(),
    };

    let slice = bracket_slice(payload).ok_or_else(|| {
        LlmError::MalformedResponse(format!("{} (no bracketed array found)", strict_error))
    })?;

    match serde_json::from_str::<Value>(slice) {
        Ok(Value::Array(items)) => {
            debug!("Recovered JSON array from {} of {} payload chars", slice.len(), payload.len());
            Ok(ParsedArray {
                items,
                strategy: ParseStrategy::BracketSlice,
            })
        }
        Ok(other) => Err(LlmError::MalformedResponse(format!(
            "expected a JSON array, got {}",
            json_kind(&other)
        ))),
        Err(e) => Err(LlmError::MalformedResponse(format!(
            "{} (bracket slice: {})",
            strict_error, e
        ))),
    }
}

/// Slice between the first `[` and the last `]`, inclusive
fn bracket_slice(payload: &str) -> Option<&str> {
    let start = payload.find('[')?;
    let end = payload.rfind(']')?;
    if end > start {
        Some(&payload[start..=end])
    } else {
        None
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_plain_array() {
        let parsed = parse_json_array(r#"[{"fact": "Water boils at 100 °C."}]"#).unwrap();
        assert_eq!(parsed.strategy, ParseStrategy::Strict);
        assert_eq!(parsed.items, vec![json!({"fact": "Water boils at 100 °C."})]);
    }

    #[test]
    fn test_parse_with_surrounding_whitespace() {
        let parsed = parse_json_array("\n  [1, 2]  \n").unwrap();
        assert_eq!(parsed.strategy, ParseStrategy::Strict);
        assert_eq!(parsed.items.len(), 2);
    }

    #[test]
    fn test_parse_array_wrapped_in_prose() {
        let payload = "Sure! Here are your cards:\n[{\"front\": \"Q\", \"back\": \"A\"}]\nLet me know.";
        let parsed = parse_json_array(payload).unwrap();
        assert_eq!(parsed.strategy, ParseStrategy::BracketSlice);
        assert_eq!(parsed.items.len(), 1);
    }

    #[test]
    fn test_parse_json_with_markdown_wrapper() {
        let payload = "```json\n[\"a\", \"b\"]\n```";
        let parsed = parse_json_array(payload).unwrap();
        assert_eq!(parsed.strategy, ParseStrategy::BracketSlice);
        assert_eq!(parsed.items, vec![json!("a"), json!("b")]);
    }

    #[test]
    fn test_object_with_inner_array_is_recovered() {
        let parsed = parse_json_array(r#"{"cards": [{"front": "Q", "back": "A"}]}"#).unwrap();
        assert_eq!(parsed.strategy, ParseStrategy::BracketSlice);
        assert_eq!(parsed.items.len(), 1);
    }

    #[test]
    fn test_parse_invalid_json() {
        let result = parse_json_array("This is not JSON");
        assert!(matches!(result, Err(LlmError::MalformedResponse(_))));
    }

    #[test]
    fn test_parse_json_not_array() {
        let result = parse_json_array(r#"{"fact": "no brackets here"}"#);
        assert!(matches!(result, Err(LlmError::MalformedResponse(_))));
    }

    #[test]
    fn test_reversed_brackets_fail() {
        let result = parse_json_array("] nothing [");
        assert!(matches!(result, Err(LlmError::MalformedResponse(_))));
    }

    #[test]
    fn test_broken_slice_fails() {
        let result = parse_json_array("prefix [{\"front\": } suffix]");
        assert!(matches!(result, Err(LlmError::MalformedResponse(_))));
    }

    #[test]
    fn test_empty_array() {
        let parsed = parse_json_array("[]").unwrap();
        assert!(parsed.items.is_empty());
    }
}
