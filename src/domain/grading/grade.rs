//! Grade values. Each grader yields exactly one of two values; the negative
//! value is also what a grader reports when it cannot decide.

use serde::{Deserialize, Serialize};

/// Whether a passage bears on the question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relevance {
    Relevant,
    NotRelevant,
}

/// Whether an answer is supported by the evidence it was generated from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Grounding {
    Grounded,
    Hallucinated,
}

/// Whether an answer actually resolves the question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Usefulness {
    Useful,
    NotUseful,
}

impl Relevance {
    pub fn from_verdict(positive: bool) -> Self {
        if positive { Self::Relevant } else { Self::NotRelevant }
    }

    pub fn is_relevant(&self) -> bool {
        matches!(self, Self::Relevant)
    }
}

impl Grounding {
    pub fn from_verdict(positive: bool) -> Self {
        if positive { Self::Grounded } else { Self::Hallucinated }
    }

    pub fn is_grounded(&self) -> bool {
        matches!(self, Self::Grounded)
    }
}

impl Usefulness {
    pub fn from_verdict(positive: bool) -> Self {
        if positive { Self::Useful } else { Self::NotUseful }
    }

    pub fn is_useful(&self) -> bool {
        matches!(self, Self::Useful)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_verdict() {
        assert_eq!(Relevance::from_verdict(true), Relevance::Relevant);
        assert_eq!(Grounding::from_verdict(false), Grounding::Hallucinated);
        assert!(Usefulness::from_verdict(true).is_useful());
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_string(&Relevance::NotRelevant).unwrap();
        assert_eq!(json, "\"not_relevant\"");
    }
}
