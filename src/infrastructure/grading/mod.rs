//! LLM-backed graders

mod llm_grader;
mod verdict;

pub use llm_grader::{LlmAnswerGrader, LlmHallucinationGrader, LlmRelevanceGrader};
pub use verdict::parse_verdict;
