//! Fact module - intermediate unit of the exhaustive pipeline

use std::fmt;

/// An atomic statement extracted from study text
///
/// Facts are immutable once extracted. Their deduplication key is computed by
/// the extractor, which owns text normalization.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fact {
    text: String,
}

impl Fact {
    /// Create a fact from raw text, trimming surrounding whitespace
    ///
    /// Returns `None` for empty text.
    pub fn new(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            None
        } else {
            Some(Self {
                text: text.to_string(),
            })
        }
    }

    /// The statement itself
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for Fact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
