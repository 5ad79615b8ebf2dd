//! Card module - the output unit of a generation run

use std::fmt;

/// Style of a flashcard
///
/// The completion service is told which modes are allowed and tags every card
/// it returns with one of them. Unrecognized tags fall back to
/// [`CardMode::BasicRecall`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardMode {
    /// Plain question and answer
    BasicRecall,

    /// Cloze deletion; the front carries `{{c1::...}}` markup
    FillInBlank,

    /// Why/how question about a mechanism
    Mechanism,

    /// Applied case or vignette
    Scenario,
}

impl CardMode {
    /// All modes in canonical order
    pub const ALL: [CardMode; 4] = [
        CardMode::BasicRecall,
        CardMode::FillInBlank,
        CardMode::Mechanism,
        CardMode::Scenario,
    ];

    /// Canonical label, as shown to the completion service
    pub fn label(&self) -> &'static str {
        match self {
            CardMode::BasicRecall => "Basic Recall (Q/A)",
            CardMode::FillInBlank => "Fill in the Blank",
            CardMode::Mechanism => "Mechanism (Why/How)",
            CardMode::Scenario => "Scenario",
        }
    }

    fn aliases(&self) -> &'static [&'static str] {
        match self {
            CardMode::BasicRecall => &["recall", "basic", "qa", "q/a"],
            CardMode::FillInBlank => &["fill in the blank", "fill-in-the-blank", "cloze"],
            CardMode::Mechanism => &["mechanism", "why", "how", "why/how"],
            CardMode::Scenario => &["scenario", "case", "vignette"],
        }
    }

    /// Parse a mode label or alias, case-insensitively
    ///
    /// Returns `None` for anything unrecognized; use [`CardMode::normalize`]
    /// when a fallback is wanted.
    pub fn parse(s: &str) -> Option<Self> {
        let needle = s.trim().to_lowercase();
        Self::ALL.into_iter().find(|mode| {
            needle == mode.label().to_lowercase() || mode.aliases().contains(&needle.as_str())
        })
    }

    /// Parse a mode, falling back to [`CardMode::BasicRecall`]
    ///
    /// # Examples
    ///
    /// ```
    /// use ankify_domain::CardMode;
    ///
    /// assert_eq!(CardMode::normalize("cloze"), CardMode::FillInBlank);
    /// assert_eq!(CardMode::normalize("Why/How"), CardMode::Mechanism);
    /// assert_eq!(CardMode::normalize("haiku"), CardMode::BasicRecall);
    /// ```
    pub fn normalize(s: &str) -> Self {
        Self::parse(s).unwrap_or(CardMode::BasicRecall)
    }

    /// Deck template used to render cards of this mode
    pub fn template(&self) -> CardTemplate {
        match self {
            CardMode::FillInBlank => CardTemplate::Cloze,
            _ => CardTemplate::Basic,
        }
    }
}

impl Default for CardMode {
    fn default() -> Self {
        CardMode::BasicRecall
    }
}

impl fmt::Display for CardMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Normalize a caller-supplied list of modes
///
/// Each entry maps through [`CardMode::normalize`]; duplicates are dropped
/// keeping first-seen order. An empty input yields `[BasicRecall]`.
pub fn normalize_modes<S: AsRef<str>>(modes: &[S]) -> Vec<CardMode> {
    let mut out: Vec<CardMode> = Vec::new();
    for mode in modes.iter().map(|m| CardMode::normalize(m.as_ref())) {
        if !out.contains(&mode) {
            out.push(mode);
        }
    }
    if out.is_empty() {
        out.push(CardMode::BasicRecall);
    }
    out
}

/// Note template a deck exporter must provide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardTemplate {
    /// Two fields: Question / Answer
    Basic,

    /// Two fields: Text (with cloze markup) / Extra
    Cloze,
}

impl CardTemplate {
    /// Template name as understood by Anki importers
    pub fn as_str(&self) -> &'static str {
        match self {
            CardTemplate::Basic => "Basic",
            CardTemplate::Cloze => "Cloze",
        }
    }
}

/// A flashcard accepted into a deck
///
/// Two cards are the same card when their `(front, back)` pair matches
/// exactly; mode does not take part in identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    /// Prompt side
    pub front: String,

    /// Answer side
    pub back: String,

    /// Card style
    pub mode: CardMode,
}

impl Card {
    /// Create a card, trimming both sides
    ///
    /// Returns `None` when either side is empty after trimming.
    pub fn new(front: &str, back: &str, mode: CardMode) -> Option<Self> {
        let front = front.trim();
        let back = back.trim();
        if front.is_empty() || back.is_empty() {
            return None;
        }
        Some(Self {
            front: front.to_string(),
            back: back.to_string(),
            mode,
        })
    }

    /// Deduplication identity
    pub fn pair(&self) -> (String, String) {
        (self.front.clone(), self.back.clone())
    }

    /// Template this card renders with
    pub fn template(&self) -> CardTemplate {
        self.mode.template()
    }
}
