//! LLM-backed answer generation and question rewriting

mod llm_generator;
mod llm_rewriter;

pub use llm_generator::LlmGenerator;
pub use llm_rewriter::LlmQueryRewriter;
