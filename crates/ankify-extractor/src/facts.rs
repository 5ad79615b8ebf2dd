//! Fact extraction through the completion client

use crate::chunking::Chunk;
use crate::error::ExtractorError;
use crate::normalize::fact_key;
use crate::prompt::extraction_request;
use ankify_domain::traits::CompletionProvider;
use ankify_domain::Fact;
use ankify_llm::{CompletionClient, LlmError};
use serde::de::IgnoredAny;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;
use tracing::{debug, info};

/// One element of the extraction payload
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FactItem {
    Text(String),
    Object { fact: Option<String> },
    Other(IgnoredAny),
}

impl FactItem {
    fn from_value(value: Value) -> Option<Fact> {
        match serde_json::from_value::<FactItem>(value).ok()? {
            FactItem::Text(text) => Fact::new(&text),
            FactItem::Object { fact: Some(text) } => Fact::new(&text),
            FactItem::Object { fact: None } | FactItem::Other(_) => None,
        }
    }
}

/// Deduplicated facts accumulated across chunks, in first-seen order
#[derive(Debug, Default, Clone)]
pub struct FactSet {
    keys: HashSet<String>,
    facts: Vec<Fact>,
}

impl FactSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `fact` unless an equivalent one is already present
    ///
    /// Returns `true` when the fact was new.
    pub fn insert(&mut self, fact: Fact) -> bool {
        if self.keys.insert(fact_key(fact.text())) {
            self.facts.push(fact);
            true
        } else {
            false
        }
    }

    /// Number of distinct facts
    pub fn len(&self) -> usize {
        self.facts.len()
    }

    /// Whether no facts were collected
    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    /// Facts in first-seen order
    pub fn facts(&self) -> &[Fact] {
        &self.facts
    }
}

/// Extracts atomic facts from chunks
pub struct FactExtractor<P> {
    client: CompletionClient<P>,
}

impl<P> FactExtractor<P>
where
    P: CompletionProvider + Send + Sync + 'static,
    P::Error: Into<LlmError>,
{
    /// Create an extractor on top of `client`
    pub fn new(client: CompletionClient<P>) -> Self {
        Self { client }
    }

    /// Ask for up to `max_facts` facts from `chunk` and merge them into `seen`
    ///
    /// Returns how many facts were new to `seen`.
    pub async fn extract(
        &self,
        chunk: &Chunk,
        max_facts: usize,
        seen: &mut FactSet,
    ) -> Result<usize, ExtractorError> {
        let request = extraction_request(&chunk.text, max_facts);
        let parsed = self.client.complete_array(request).await?;
        let returned = parsed.items.len();

        let added = parsed
            .items
            .into_iter()
            .filter_map(FactItem::from_value)
            .filter(|fact| seen.insert(fact.clone()))
            .count();

        debug!(
            "Chunk {}: {} items returned, {} new facts ({:?})",
            chunk.index, returned, added, parsed.strategy
        );
        info!("Extracted {} new facts from chunk {}", added, chunk.index);

        Ok(added)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunking::Chunker;
    use ankify_llm::MockProvider;

    fn chunk() -> Chunk {
        Chunker::default().chunk("The heart has four chambers.").to_vec().remove(0)
    }

    fn extractor(provider: MockProvider) -> FactExtractor<MockProvider> {
        FactExtractor::new(CompletionClient::new(provider))
    }

    #[test]
    fn test_fact_set_dedups_by_key() {
        let mut set = FactSet::new();
        assert!(set.insert(Fact::new("The heart has four chambers.").unwrap()));
        assert!(!set.insert(Fact::new("the heart has four chambers").unwrap()));
        assert!(!set.insert(Fact::new("THE HEART  HAS FOUR CHAMBERS .").unwrap()));
        assert!(set.insert(Fact::new("The heart has two atria.").unwrap()));

        assert_eq!(set.len(), 2);
        assert_eq!(set.facts()[0].text(), "The heart has four chambers.");
        assert_eq!(set.facts()[1].text(), "The heart has two atria.");
    }

    #[test]
    fn test_fact_item_shapes() {
        assert!(FactItem::from_value(serde_json::json!("A fact.")).is_some());
        assert!(FactItem::from_value(serde_json::json!({"fact": "A fact."})).is_some());
        assert!(FactItem::from_value(serde_json::json!({"fact": "   "})).is_none());
        assert!(FactItem::from_value(serde_json::json!({"other": "x"})).is_none());
        assert!(FactItem::from_value(serde_json::json!({"fact": 12})).is_none());
        assert!(FactItem::from_value(serde_json::json!(42)).is_none());
        assert!(FactItem::from_value(serde_json::json!(null)).is_none());
    }

    #[tokio::test]
    async fn test_extract_merges_and_dedups() {
        let provider = MockProvider::new(
            r#"[{"fact": "The heart has four chambers."}, "the heart has four chambers", 7, {"fact": ""}, {"fact": "Atria receive blood."}]"#,
        );
        let extractor = extractor(provider.clone());
        let mut seen = FactSet::new();

        let added = extractor.extract(&chunk(), 40, &mut seen).await.unwrap();
        assert_eq!(added, 2);
        assert_eq!(seen.len(), 2);

        // Same payload again adds nothing
        let added = extractor.extract(&chunk(), 40, &mut seen).await.unwrap();
        assert_eq!(added, 0);
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn test_extract_sends_extraction_prompt() {
        let provider = MockProvider::default();
        let extractor = extractor(provider.clone());

        extractor.extract(&chunk(), 55, &mut FactSet::new()).await.unwrap();

        let requests = provider.requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].user.contains("up to 55 atomic facts"));
        assert!(requests[0].user.contains("The heart has four chambers."));
    }

    #[tokio::test]
    async fn test_extract_surfaces_malformed_payload() {
        let extractor = extractor(MockProvider::new("sorry, no facts"));
        let result = extractor.extract(&chunk(), 40, &mut FactSet::new()).await;
        assert!(matches!(
            result,
            Err(ExtractorError::Llm(LlmError::MalformedResponse(_)))
        ));
    }
}
