use serde::{Deserialize, Serialize};

use super::RagState;
use crate::domain::generation::Answer;
use crate::domain::index::ScoredPassage;

/// Terminal status of one controller run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RagStatus {
    Done,
    Exhausted,
}

/// Result of one controller run. Never an error: exhaustion carries the
/// fallback message as `text`.
#[derive(Debug, Clone)]
pub struct RagOutcome {
    pub text: String,
    pub status: RagStatus,
    /// Attempts spent on rewrites
    pub attempts: u32,
    /// The validated answer when `status` is `Done`
    pub answer: Option<Answer>,
    /// Evidence the final answer was generated from
    pub evidence: Vec<ScoredPassage>,
    /// States visited, in order
    pub trace: Vec<RagState>,
}

impl RagOutcome {
    pub fn is_done(&self) -> bool {
        self.status == RagStatus::Done
    }
}
