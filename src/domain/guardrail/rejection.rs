use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Why a guardrail refused a question or an answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    QueryTooShort,
    PromptInjection,
    UnsafeTopic,
    NoContext,
    LowGrounding,
    MissingCitations,
    UnknownCitations,
}

impl RejectionReason {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            Self::QueryTooShort => "query_too_short",
            Self::PromptInjection => "prompt_injection",
            Self::UnsafeTopic => "unsafe_topic",
            Self::NoContext => "no_context",
            Self::LowGrounding => "low_grounding",
            Self::MissingCitations => "missing_citations",
            Self::UnknownCitations => "unknown_citations",
        }
    }
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl From<RejectionReason> for DomainError {
    fn from(reason: RejectionReason) -> Self {
        DomainError::guardrail_rejected(reason.code())
    }
}
