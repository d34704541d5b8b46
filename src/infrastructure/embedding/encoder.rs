//! Mode-aware text encoder over an embedding provider

use std::sync::Arc;

use tracing::debug;

use crate::domain::embedding::{
    EmbeddingProvider, EmbeddingRequest, EncodingMode, EncodingPrefixes,
};
use crate::domain::DomainError;

/// Embeds text as a query or as a passage, applying the mode's prefix
#[derive(Debug, Clone)]
pub struct TextEncoder {
    provider: Arc<dyn EmbeddingProvider>,
    model: String,
    prefixes: EncodingPrefixes,
}

impl TextEncoder {
    pub fn new(provider: Arc<dyn EmbeddingProvider>, prefixes: EncodingPrefixes) -> Self {
        let model = provider.default_model().to_string();
        Self {
            provider,
            model,
            prefixes,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Embed a single question in query mode
    pub async fn encode_query(&self, text: &str) -> Result<Vec<f32>, DomainError> {
        let mut vectors = self.encode(EncodingMode::Query, &[text.to_string()]).await?;
        vectors
            .pop()
            .ok_or_else(|| DomainError::provider(self.provider.provider_name(), "Empty embedding response"))
    }

    /// Embed chunks in passage mode, preserving order
    pub async fn encode_passages(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, DomainError> {
        self.encode(EncodingMode::Passage, texts).await
    }

    async fn encode(
        &self,
        mode: EncodingMode,
        texts: &[String],
    ) -> Result<Vec<Vec<f32>>, DomainError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let inputs: Vec<String> = texts.iter().map(|t| self.prefixes.apply(mode, t)).collect();
        debug!(mode = ?mode, count = inputs.len(), model = %self.model, "Encoding texts");

        let response = self
            .provider
            .embed(EmbeddingRequest::new(self.model.clone(), inputs))
            .await?;

        Ok(response.into_vectors())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::embedding::MockEmbeddingProvider;

    #[tokio::test]
    async fn test_query_mode_uses_query_prefix() {
        let provider = MockEmbeddingProvider::new("mock", 2)
            .with_vector("query: capital of France", vec![1.0, 0.0])
            .with_vector("passage: capital of France", vec![0.0, 1.0]);
        let encoder = TextEncoder::new(Arc::new(provider), EncodingPrefixes::default());

        let query = encoder.encode_query("capital of France").await.unwrap();
        let passages = encoder
            .encode_passages(&["capital of France".to_string()])
            .await
            .unwrap();

        assert_eq!(query, vec![1.0, 0.0]);
        assert_eq!(passages, vec![vec![0.0, 1.0]]);
    }

    #[tokio::test]
    async fn test_empty_batch_skips_provider() {
        let provider = MockEmbeddingProvider::new("mock", 2).with_error("should not be called");
        let encoder = TextEncoder::new(Arc::new(provider), EncodingPrefixes::default());

        assert!(encoder.encode_passages(&[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_provider_error_propagates() {
        let provider = MockEmbeddingProvider::new("mock", 2).with_error("down");
        let encoder = TextEncoder::new(Arc::new(provider), EncodingPrefixes::none());

        assert!(encoder.encode_query("anything").await.is_err());
    }
}
