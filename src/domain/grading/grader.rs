//! Grader traits. Graders never fail: when a verdict cannot be obtained they
//! return the negative grade.

use async_trait::async_trait;
use std::fmt::Debug;

use super::{Grounding, Relevance, Usefulness};
use crate::domain::index::ScoredPassage;

#[async_trait]
pub trait RelevanceGrader: Send + Sync + Debug {
    async fn grade(&self, question: &str, passage: &ScoredPassage) -> Relevance;
}

#[async_trait]
pub trait HallucinationGrader: Send + Sync + Debug {
    async fn grade(&self, evidence: &[ScoredPassage], answer: &str) -> Grounding;
}

#[async_trait]
pub trait AnswerGrader: Send + Sync + Debug {
    async fn grade(&self, question: &str, answer: &str) -> Usefulness;
}
