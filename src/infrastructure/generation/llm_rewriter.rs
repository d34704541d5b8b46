use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::generation::QueryRewriter;
use crate::domain::grading::render;
use crate::domain::llm::{LlmProvider, LlmRequest};
use crate::domain::DomainError;

/// Reformulates a question for better vector retrieval
#[derive(Debug, Clone)]
pub struct LlmQueryRewriter {
    provider: Arc<dyn LlmProvider>,
    model: String,
    prompt: String,
}

impl LlmQueryRewriter {
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        model: impl Into<String>,
        prompt: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            model: model.into(),
            prompt: prompt.into(),
        }
    }
}

#[async_trait]
impl QueryRewriter for LlmQueryRewriter {
    async fn rewrite(&self, question: &str) -> Result<String, DomainError> {
        let request = LlmRequest::builder()
            .user(render(&self.prompt, &[("question", question)]))
            .temperature(0.0)
            .max_tokens(200)
            .build();

        let response = self.provider.chat(&self.model, request).await?;
        let rewritten = response.content().trim().trim_matches('"').trim();

        if rewritten.is_empty() {
            return Err(DomainError::provider(
                self.provider.provider_name(),
                "Empty rewrite from LLM",
            ));
        }

        debug!(original = question, rewritten, "Question rewritten");
        Ok(rewritten.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::grading::GradingPrompts;
    use crate::domain::llm::MockLlmProvider;

    #[tokio::test]
    async fn test_rewrite_trims_output() {
        let provider = Arc::new(
            MockLlmProvider::new("mock").with_content("\n \"What city is the capital of France?\" \n"),
        );
        let rewriter =
            LlmQueryRewriter::new(provider.clone(), "m", GradingPrompts::default().rewrite);

        let rewritten = rewriter.rewrite("capital France").await.unwrap();

        assert_eq!(rewritten, "What city is the capital of France?");
        assert!(provider.requests()[0].user_text().contains("capital France"));
    }

    #[tokio::test]
    async fn test_empty_rewrite_is_an_error() {
        let provider = Arc::new(MockLlmProvider::new("mock").with_content("  "));
        let rewriter = LlmQueryRewriter::new(provider, "m", "${question}");

        assert!(rewriter.rewrite("capital France").await.is_err());
    }
}
