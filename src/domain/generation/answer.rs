use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// A generated answer and the evidence it cites
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub text: String,
    /// Cited passage ids that were part of the evidence
    pub evidence_ids: BTreeSet<u64>,
    /// Set once the answer passed both verification gates
    pub validated: bool,
}

impl Answer {
    pub fn new(text: impl Into<String>, evidence_ids: BTreeSet<u64>) -> Self {
        Self {
            text: text.into(),
            evidence_ids,
            validated: false,
        }
    }

    pub(crate) fn mark_validated(mut self) -> Self {
        self.validated = true;
        self
    }
}
