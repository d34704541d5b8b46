use serde::{Deserialize, Serialize};

/// Guardrail thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuardrailConfig {
    /// Shortest accepted question, in characters after trimming
    #[serde(default = "default_min_query_chars")]
    pub min_query_chars: usize,
    /// Answers are truncated to this many characters
    #[serde(default = "default_max_answer_chars")]
    pub max_answer_chars: usize,
    /// Minimum mean retrieval score of the evidence behind an answer
    #[serde(default = "default_grounding_min_score")]
    pub grounding_min_score: f32,
}

fn default_min_query_chars() -> usize {
    8
}

fn default_max_answer_chars() -> usize {
    4000
}

fn default_grounding_min_score() -> f32 {
    0.25
}

impl Default for GuardrailConfig {
    fn default() -> Self {
        Self {
            min_query_chars: default_min_query_chars(),
            max_answer_chars: default_max_answer_chars(),
            grounding_min_score: default_grounding_min_score(),
        }
    }
}

impl GuardrailConfig {
    pub fn with_min_query_chars(mut self, chars: usize) -> Self {
        self.min_query_chars = chars;
        self
    }

    pub fn with_max_answer_chars(mut self, chars: usize) -> Self {
        self.max_answer_chars = chars;
        self
    }

    pub fn with_grounding_min_score(mut self, score: f32) -> Self {
        self.grounding_min_score = score;
        self
    }
}
