//! Guarded question answering

use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::domain::error::DomainError;
use crate::domain::rag::RagStatus;
use crate::infrastructure::guardrail::Guardrails;
use crate::infrastructure::rag::RagController;

/// How a returned answer came about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerStatus {
    /// Validated and grounded answer
    Answered,
    /// Attempt budget spent; the text is the fallback message
    Exhausted,
    /// Validated but failed the grounding check; the text is the fallback message
    Ungrounded,
}

/// Final text handed to a caller, always passed through the output filter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerResult {
    pub text: String,
    pub attempts: u32,
    pub status: AnswerStatus,
}

/// Trait for the answer service (for dynamic dispatch in AppState)
#[async_trait]
pub trait AnswerServiceTrait: Send + Sync + Debug {
    /// Answer a question. Guardrail rejections of the question are the only
    /// errors.
    async fn answer(&self, question: &str) -> Result<AnswerResult, DomainError>;
}

#[derive(Debug, Clone)]
pub struct AnswerService {
    controller: Arc<RagController>,
    guardrails: Guardrails,
}

impl AnswerService {
    pub fn new(controller: Arc<RagController>, guardrails: Guardrails) -> Self {
        Self {
            controller,
            guardrails,
        }
    }
}

#[async_trait]
impl AnswerServiceTrait for AnswerService {
    #[instrument(skip(self, question))]
    async fn answer(&self, question: &str) -> Result<AnswerResult, DomainError> {
        if let Err(reason) = self.guardrails.validate_query(question) {
            warn!(reason = %reason, "Question rejected");
            metrics::counter!("rag_answers_total", "status" => "rejected").increment(1);
            return Err(reason.into());
        }

        let outcome = self.controller.answer(question).await;
        let fallback = &self.controller.config().fallback_message;

        let (text, status) = match outcome.status {
            RagStatus::Exhausted => (outcome.text.as_str(), AnswerStatus::Exhausted),
            RagStatus::Done => match self
                .guardrails
                .enforce_grounding(&outcome.text, &outcome.evidence)
            {
                Ok(()) => (outcome.text.as_str(), AnswerStatus::Answered),
                Err(reason) => {
                    warn!(reason = %reason, "Validated answer failed grounding check");
                    (fallback.as_str(), AnswerStatus::Ungrounded)
                }
            },
        };

        info!(status = ?status, attempts = outcome.attempts, "Answer ready");

        Ok(AnswerResult {
            text: self.guardrails.filter_output(text),
            attempts: outcome.attempts,
            status,
        })
    }
}
