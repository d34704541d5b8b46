//! Cited answer generation over retrieved evidence

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, warn};

use crate::domain::generation::{cited_ids, Answer, GenerationConfig, Generator};
use crate::domain::grading::render;
use crate::domain::index::ScoredPassage;
use crate::domain::llm::{LlmProvider, LlmRequest};
use crate::domain::DomainError;

/// Evidence as shown to the model
#[derive(Debug, Serialize)]
struct ContextEntry<'a> {
    id: u64,
    source: &'a str,
    text: &'a str,
}

#[derive(Debug, Clone)]
pub struct LlmGenerator {
    provider: Arc<dyn LlmProvider>,
    model: String,
    config: GenerationConfig,
}

impl LlmGenerator {
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        model: impl Into<String>,
        config: GenerationConfig,
    ) -> Self {
        Self {
            provider,
            model: model.into(),
            config,
        }
    }

    fn render_context(evidence: &[ScoredPassage]) -> Result<String, DomainError> {
        let entries: Vec<ContextEntry<'_>> = evidence
            .iter()
            .map(|p| ContextEntry {
                id: p.id(),
                source: &p.passage.source,
                text: p.text(),
            })
            .collect();

        serde_json::to_string_pretty(&entries)
            .map_err(|e| DomainError::internal(format!("Failed to render context: {}", e)))
    }
}

#[async_trait]
impl Generator for LlmGenerator {
    async fn generate(
        &self,
        question: &str,
        evidence: &[ScoredPassage],
    ) -> Result<Answer, DomainError> {
        let context = Self::render_context(evidence)?;
        let prompt = render(
            &self.config.user_template,
            &[("question", question), ("context", &context)],
        );

        let request = LlmRequest::builder()
            .system(self.config.system_prompt.clone())
            .user(prompt)
            .temperature(self.config.temperature)
            .max_tokens(self.config.max_tokens)
            .build();

        debug!(model = %self.model, evidence = evidence.len(), "Generating answer");

        let response = self.provider.chat(&self.model, request).await?;
        if response.truncated {
            warn!(max_tokens = self.config.max_tokens, "Answer cut at the token limit");
        }
        let text = response.content().trim().to_string();

        if text.is_empty() {
            return Err(DomainError::provider(
                self.provider.provider_name(),
                "Empty answer from LLM",
            ));
        }

        let known: BTreeSet<u64> = evidence.iter().map(|p| p.id()).collect();
        let cited = cited_ids(&text);
        let unknown: Vec<u64> = cited.difference(&known).copied().collect();
        if !unknown.is_empty() {
            warn!(?unknown, "Answer cites passages outside its evidence");
        }

        let evidence_ids = cited.intersection(&known).copied().collect();
        Ok(Answer::new(text, evidence_ids))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::index::Passage;
    use crate::domain::llm::{MessageRole, MockLlmProvider};

    fn evidence() -> Vec<ScoredPassage> {
        vec![
            ScoredPassage::new(Passage::new(4, "geo.txt", 0, "Paris is the capital of France."), 0.9),
            ScoredPassage::new(Passage::new(9, "geo.txt", 5, "Lyon is the third city."), 0.6),
        ]
    }

    #[tokio::test]
    async fn test_generate_keeps_known_citations() {
        let provider = Arc::new(
            MockLlmProvider::new("mock").with_content("  Paris is the capital [#4] [#77].  "),
        );
        let generator = LlmGenerator::new(provider, "gpt-4o-mini", GenerationConfig::default());

        let answer = generator.generate("capital of France?", &evidence()).await.unwrap();

        assert_eq!(answer.text, "Paris is the capital [#4] [#77].");
        assert_eq!(answer.evidence_ids.into_iter().collect::<Vec<_>>(), vec![4]);
        assert!(!answer.validated);
    }

    #[tokio::test]
    async fn test_prompt_carries_question_and_context() {
        let provider = Arc::new(MockLlmProvider::new("mock").with_content("Paris [#4]"));
        let generator =
            LlmGenerator::new(provider.clone(), "gpt-4o-mini", GenerationConfig::default());

        generator.generate("capital of France?", &evidence()).await.unwrap();

        let request = &provider.requests()[0];
        assert_eq!(request.messages[0].role, MessageRole::System);
        assert_eq!(request.temperature, Some(0.3));
        assert_eq!(request.max_tokens, Some(512));

        let user = request.user_text();
        assert!(user.contains("capital of France?"));
        assert!(user.contains("\"id\": 4"));
        assert!(user.contains("Lyon is the third city."));
        assert!(!user.contains("${context}"));
    }

    #[tokio::test]
    async fn test_empty_reply_is_an_error() {
        let provider = Arc::new(MockLlmProvider::new("mock").with_content("   "));
        let generator = LlmGenerator::new(provider, "m", GenerationConfig::default());

        assert!(generator.generate("q", &evidence()).await.is_err());
    }

    #[tokio::test]
    async fn test_provider_error_propagates() {
        let provider = Arc::new(MockLlmProvider::new("mock").with_error("down"));
        let generator = LlmGenerator::new(provider, "m", GenerationConfig::default());

        let result = generator.generate("q", &evidence()).await;
        assert!(matches!(result, Err(DomainError::Provider { .. })));
    }
}
