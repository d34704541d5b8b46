//! Binary LLM graders used as verification gates

mod grade;
mod grader;
mod prompts;

pub use grade::{Grounding, Relevance, Usefulness};
pub use grader::{AnswerGrader, HallucinationGrader, RelevanceGrader};
pub use prompts::{render, GradingPrompts};

#[cfg(test)]
pub use grader::mock::{MockAnswerGrader, MockHallucinationGrader, MockRelevanceGrader};
