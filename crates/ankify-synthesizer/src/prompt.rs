//! Prompts for card synthesis

use ankify_domain::{CardMode, CompletionRequest, Fact};
use serde_json::json;

/// Sampling temperature for synthesis calls
pub const SYNTHESIS_TEMPERATURE: f32 = 0.2;

/// Response token budget for synthesis calls
pub const SYNTHESIS_MAX_TOKENS: u32 = 1800;

/// Question stems the service is told to avoid
pub const BANNED_STEMS: [&str; 6] = [
    "What does this mean",
    "Which of the following",
    "All of the following",
    "True or False",
    "T/F",
    "Select all that apply",
];

const FACTS_SYSTEM: &str =
    "You turn atomic facts into precise Anki flashcards. Output STRICT JSON only.";

const CHUNK_SYSTEM: &str =
    "You convert study text into high-quality Anki flashcards. Output STRICT JSON only.";

fn mode_list(modes: &[CardMode]) -> String {
    modes.iter().map(CardMode::label).collect::<Vec<_>>().join(", ")
}

fn canonical_modes() -> String {
    CardMode::ALL.iter().map(CardMode::label).collect::<Vec<_>>().join(" | ")
}

fn banned_list() -> String {
    BANNED_STEMS
        .iter()
        .map(|stem| format!("\"{}\"", stem))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Build the request turning `facts` into one card each
pub fn cards_from_facts_request(facts: &[Fact], modes: &[CardMode]) -> CompletionRequest {
    let facts_json = serde_json::Value::Array(
        facts.iter().map(|fact| json!({ "fact": fact.text() })).collect(),
    );

    let user = format!(
        r#"FACTS (JSON):
{facts_json}

MODES ALLOWED: {modes}

CONVERT each fact into exactly one flashcard object:
{{"front": "...", "back": "...", "mode": "<one of {canonical}>"}}

RULES:
- Front must cue the exact fact with a specific question (avoid vague stems; avoid {banned}).
- Answers concise (≈5–35 words).
- If "Fill in the Blank", put one/two key terms in {{{{c1::...}}}} on the FRONT; explanation on the back.
- Stay faithful to the fact; no hallucinations.
- Return STRICT JSON ARRAY ONLY.
"#,
        modes = mode_list(modes),
        canonical = canonical_modes(),
        banned = banned_list(),
    );

    CompletionRequest::new(FACTS_SYSTEM, user, SYNTHESIS_TEMPERATURE, SYNTHESIS_MAX_TOKENS)
}

/// Build the request asking for up to `n_cards` cards straight from a chunk
pub fn cards_from_chunk_request(
    chunk_text: &str,
    n_cards: usize,
    modes: &[CardMode],
    yield_level: f64,
) -> CompletionRequest {
    let user = format!(
        r#"You will read STUDY TEXT and produce up to {n_cards} high-quality Anki flashcards.

STUDY TEXT (already cleaned of numeric citations like [61]):
<<<{chunk_text}>>>

MODES ALLOWED: {modes}

YIELD LEVEL: {yield_level} (0 = broad coverage, 1 = only highest-yield)
INTERPRETATION:
- If yield is low (≤0.3): prefer coverage; include granular facts, definitions, thresholds, lists.
- If yield is mid (~0.5): mix coverage with key concepts.
- If yield is high (≥0.8): choose only the highest-yield mechanistic/diagnostic/first-line facts.

REQUIREMENTS:
- Return STRICT JSON ARRAY. Each item: {{"front": "...", "back": "...", "mode": "<one of {canonical}>"}}
- Questions MUST be specific; avoid vague stems like {banned}.
- Answers concise (≈5–35 words) and factual.
- For "Fill in the Blank", put Anki cloze like {{{{c1::term}}}} in the FRONT; explanations can go in the back.
- Avoid duplicates; avoid trivial rephrasings.
- Distribute cards across distinct ideas present in the text (do not over-focus on a single sentence).
"#,
        modes = mode_list(modes),
        canonical = canonical_modes(),
        banned = banned_list(),
    );

    CompletionRequest::new(CHUNK_SYSTEM, user, SYNTHESIS_TEMPERATURE, SYNTHESIS_MAX_TOKENS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_facts_request_embeds_facts_as_json() {
        let facts = vec![
            Fact::new("Water boils at 100 °C.").unwrap(),
            Fact::new("Ice melts at 0 °C.").unwrap(),
        ];
        let request = cards_from_facts_request(&facts, &[CardMode::BasicRecall, CardMode::FillInBlank]);

        assert!(request.user.starts_with("FACTS (JSON):"));
        assert!(request.user.contains(r#"{"fact":"Water boils at 100 °C."}"#));
        assert!(request.user.contains("MODES ALLOWED: Basic Recall (Q/A), Fill in the Blank"));
        assert!(request.user.contains("{{c1::...}}"));
        assert!(request.user.contains("\"Select all that apply\""));
        assert_eq!(request.temperature, SYNTHESIS_TEMPERATURE);
        assert_eq!(request.max_tokens, SYNTHESIS_MAX_TOKENS);
    }

    #[test]
    fn test_chunk_request_embeds_count_and_yield() {
        let request = cards_from_chunk_request("Some text.", 7, &[CardMode::Scenario], 0.6);

        assert!(request.user.contains("produce up to 7 high-quality"));
        assert!(request.user.contains("<<<Some text.>>>"));
        assert!(request.user.contains("YIELD LEVEL: 0.6"));
        assert!(request.user.contains("MODES ALLOWED: Scenario"));
        assert!(request.user.contains("{{c1::term}}"));
        assert!(request.user.contains("\"All of the following\""));
    }
}
