//! Retriever trait definition

use async_trait::async_trait;
use std::fmt::Debug;

use crate::domain::index::ScoredPassage;
use crate::domain::DomainError;

/// Turns a question into at most `k` diverse, relevant passages
#[async_trait]
pub trait Retriever: Send + Sync + Debug {
    async fn search(
        &self,
        question: &str,
        k: usize,
        mmr_lambda: f32,
    ) -> Result<Vec<ScoredPassage>, DomainError>;
}
