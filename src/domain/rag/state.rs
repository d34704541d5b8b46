//! Controller state machine

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Where the controller is in the answer loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RagState {
    Retrieve,
    Filter,
    Generate,
    Validate,
    Rewrite,
    Done,
    Exhausted,
}

/// What happened while the controller was in a state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RagEvent {
    /// Candidate passages were fetched (possibly none)
    Retrieved,
    /// At least one passage graded relevant
    RelevantFound,
    /// Every passage graded not relevant, or there were none
    NoneRelevant,
    Generated,
    Hallucinated,
    NotUseful,
    Accepted,
    /// A collaborator failed; the attempt is spent
    Fault,
    /// The question was reformulated, or kept after a rewriter fault
    Rewritten,
    AttemptsExhausted,
}

impl RagState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Exhausted)
    }

    /// Transition table. Pairs not listed are programming errors.
    pub fn next(self, event: RagEvent) -> Result<RagState, DomainError> {
        use RagEvent as E;
        use RagState as S;

        let next = match (self, event) {
            (S::Retrieve, E::Retrieved) => S::Filter,
            (S::Filter, E::RelevantFound) => S::Generate,
            (S::Filter, E::NoneRelevant) => S::Rewrite,
            (S::Generate, E::Generated) => S::Validate,
            (S::Validate, E::Accepted) => S::Done,
            (S::Validate, E::Hallucinated | E::NotUseful) => S::Rewrite,
            (S::Retrieve | S::Filter | S::Generate | S::Validate, E::Fault) => S::Rewrite,
            (S::Rewrite, E::Rewritten | E::Fault) => S::Retrieve,
            (S::Rewrite, E::AttemptsExhausted) => S::Exhausted,
            (state, event) => {
                return Err(DomainError::internal(format!(
                    "Illegal transition: {} on {:?}",
                    state, event
                )));
            }
        };

        Ok(next)
    }
}

impl fmt::Display for RagState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Retrieve => "retrieve",
            Self::Filter => "filter",
            Self::Generate => "generate",
            Self::Validate => "validate",
            Self::Rewrite => "rewrite",
            Self::Done => "done",
            Self::Exhausted => "exhausted",
        };
        write!(f, "{}", s)
    }
}
