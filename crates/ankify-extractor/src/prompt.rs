//! Prompt for atomic fact extraction

use ankify_domain::CompletionRequest;

/// Sampling temperature for extraction calls
pub const EXTRACTION_TEMPERATURE: f32 = 0.1;

/// Response token budget for extraction calls
pub const EXTRACTION_MAX_TOKENS: u32 = 2200;

const EXTRACTION_SYSTEM: &str = "You extract atomic, testable, non-overlapping factual statements \
from study text. Output STRICT JSON only.";

/// Build the extraction request for one chunk
pub fn extraction_request(chunk_text: &str, max_facts: usize) -> CompletionRequest {
    let user = format!(
        r#"STUDY TEXT:
<<<{chunk_text}>>>

TASK:
- Return up to {max_facts} atomic facts as a JSON ARRAY of objects, each {{"fact": "..."}}.
- A fact must be a single, self-contained statement (definition, key property, threshold, mechanism step, cause→effect).
- Preserve quantitative values (cutoffs, doses, triads, first-line choices).
- Avoid redundancies; split long sentences into multiple atomic facts where appropriate.
- Use concise, neutral language. No citations.

RETURN: STRICT JSON ARRAY ONLY.
"#
    );

    CompletionRequest::new(
        EXTRACTION_SYSTEM,
        user,
        EXTRACTION_TEMPERATURE,
        EXTRACTION_MAX_TOKENS,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extraction_request_embeds_chunk_and_limit() {
        let request = extraction_request("The heart has four chambers.", 42);

        assert!(request.user.starts_with("STUDY TEXT:"));
        assert!(request.user.contains("<<<The heart has four chambers.>>>"));
        assert!(request.user.contains("up to 42 atomic facts"));
        assert!(request.user.contains(r#"{"fact": "..."}"#));
        assert_eq!(request.temperature, EXTRACTION_TEMPERATURE);
        assert_eq!(request.max_tokens, EXTRACTION_MAX_TOKENS);
        assert!(request.system.contains("STRICT JSON"));
    }
}
