//! Dense retriever: query embedding, over-fetch, then MMR re-ranking

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::domain::index::{ScoredPassage, VectorIndex};
use crate::domain::retrieval::{dedup_by_id, mmr_select, Retriever};
use crate::domain::DomainError;
use crate::infrastructure::embedding::TextEncoder;

#[derive(Debug)]
pub struct EmbeddingRetriever {
    encoder: TextEncoder,
    index: Arc<dyn VectorIndex>,
    fetch_multiplier: usize,
}

impl EmbeddingRetriever {
    pub fn new(encoder: TextEncoder, index: Arc<dyn VectorIndex>) -> Self {
        Self {
            encoder,
            index,
            fetch_multiplier: 3,
        }
    }

    /// How many candidates per requested passage are fetched before MMR
    pub fn with_fetch_multiplier(mut self, multiplier: usize) -> Self {
        self.fetch_multiplier = multiplier.max(1);
        self
    }
}

#[async_trait]
impl Retriever for EmbeddingRetriever {
    #[instrument(skip(self))]
    async fn search(
        &self,
        question: &str,
        k: usize,
        mmr_lambda: f32,
    ) -> Result<Vec<ScoredPassage>, DomainError> {
        if k == 0 || self.index.is_empty().await {
            return Ok(Vec::new());
        }

        let query = self.encoder.encode_query(question).await?;
        let fetch = k.saturating_mul(self.fetch_multiplier);
        let candidates = dedup_by_id(self.index.search(&query, fetch).await?);

        debug!(candidates = candidates.len(), "Re-ranking candidates");

        Ok(mmr_select(candidates, k, mmr_lambda))
    }
}
