//! Generator and rewriter traits

use async_trait::async_trait;
use std::fmt::Debug;

use super::Answer;
use crate::domain::index::ScoredPassage;
use crate::domain::DomainError;

/// Produces an answer grounded in, and citing, the given evidence
#[async_trait]
pub trait Generator: Send + Sync + Debug {
    async fn generate(
        &self,
        question: &str,
        evidence: &[ScoredPassage],
    ) -> Result<Answer, DomainError>;
}

/// Reformulates a question to improve retrieval
#[async_trait]
pub trait QueryRewriter: Send + Sync + Debug {
    async fn rewrite(&self, question: &str) -> Result<String, DomainError>;
}
