//! Graders that ask an LLM for a binary verdict.
//!
//! Every grader fails closed: a provider error or an unreadable reply yields
//! the negative grade and a warning, never an error.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::parse_verdict;
use crate::domain::grading::{
    render, AnswerGrader, GradingPrompts, Grounding, HallucinationGrader, Relevance,
    RelevanceGrader, Usefulness,
};
use crate::domain::index::ScoredPassage;
use crate::domain::llm::{LlmProvider, LlmRequest};
use crate::domain::DomainError;

const VERDICT_MAX_TOKENS: u32 = 20;

/// Shared plumbing: one prompt in, one yes/no out
#[derive(Debug, Clone)]
struct VerdictClient {
    provider: Arc<dyn LlmProvider>,
    model: String,
}

impl VerdictClient {
    async fn ask(&self, prompt: String) -> Result<bool, DomainError> {
        let request = LlmRequest::builder()
            .user(prompt)
            .temperature(0.0)
            .max_tokens(VERDICT_MAX_TOKENS)
            .json_mode(true)
            .build();

        let response = self.provider.chat(&self.model, request).await?;
        parse_verdict(response.content())
    }

    async fn verdict_or_no(&self, grader: &'static str, prompt: String) -> bool {
        match self.ask(prompt).await {
            Ok(verdict) => {
                debug!(grader, verdict, "Grader verdict");
                verdict
            }
            Err(e) => {
                warn!(grader, error = %e, "Grader failed, treating as negative");
                metrics::counter!("rag_soft_failures_total", "stage" => grader).increment(1);
                false
            }
        }
    }
}

/// Judges whether one passage bears on the question
#[derive(Debug, Clone)]
pub struct LlmRelevanceGrader {
    client: VerdictClient,
    prompt: String,
}

impl LlmRelevanceGrader {
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        model: impl Into<String>,
        prompts: &GradingPrompts,
    ) -> Self {
        Self {
            client: VerdictClient {
                provider,
                model: model.into(),
            },
            prompt: prompts.relevance.clone(),
        }
    }
}

#[async_trait]
impl RelevanceGrader for LlmRelevanceGrader {
    async fn grade(&self, question: &str, passage: &ScoredPassage) -> Relevance {
        let prompt = render(
            &self.prompt,
            &[("question", question), ("document", passage.text())],
        );
        Relevance::from_verdict(self.client.verdict_or_no("relevance", prompt).await)
    }
}

/// Judges whether an answer is supported by the evidence it was built from
#[derive(Debug, Clone)]
pub struct LlmHallucinationGrader {
    client: VerdictClient,
    prompt: String,
}

impl LlmHallucinationGrader {
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        model: impl Into<String>,
        prompts: &GradingPrompts,
    ) -> Self {
        Self {
            client: VerdictClient {
                provider,
                model: model.into(),
            },
            prompt: prompts.hallucination.clone(),
        }
    }
}

#[async_trait]
impl HallucinationGrader for LlmHallucinationGrader {
    async fn grade(&self, evidence: &[ScoredPassage], answer: &str) -> Grounding {
        let documents = evidence
            .iter()
            .map(|p| format!("[#{}] {}", p.id(), p.text()))
            .collect::<Vec<_>>()
            .join("\n\n");
        let prompt = render(
            &self.prompt,
            &[("documents", &documents), ("generation", answer)],
        );
        Grounding::from_verdict(self.client.verdict_or_no("hallucination", prompt).await)
    }
}

/// Judges whether an answer resolves the question
#[derive(Debug, Clone)]
pub struct LlmAnswerGrader {
    client: VerdictClient,
    prompt: String,
}

impl LlmAnswerGrader {
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        model: impl Into<String>,
        prompts: &GradingPrompts,
    ) -> Self {
        Self {
            client: VerdictClient {
                provider,
                model: model.into(),
            },
            prompt: prompts.answer.clone(),
        }
    }
}

#[async_trait]
impl AnswerGrader for LlmAnswerGrader {
    async fn grade(&self, question: &str, answer: &str) -> Usefulness {
        let prompt = render(
            &self.prompt,
            &[("question", question), ("generation", answer)],
        );
        Usefulness::from_verdict(self.client.verdict_or_no("answer", prompt).await)
    }
}
