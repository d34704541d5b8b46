//! Prompt templates for the graders and the query rewriter.
//!
//! Templates use `${name}` placeholders: `${question}`, `${document}`,
//! `${documents}` and `${generation}`.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{(\w+)\}").expect("Invalid placeholder regex"));

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradingPrompts {
    #[serde(default = "default_relevance_prompt")]
    pub relevance: String,
    #[serde(default = "default_hallucination_prompt")]
    pub hallucination: String,
    #[serde(default = "default_answer_prompt")]
    pub answer: String,
    #[serde(default = "default_rewrite_prompt")]
    pub rewrite: String,
}

impl Default for GradingPrompts {
    fn default() -> Self {
        Self {
            relevance: default_relevance_prompt(),
            hallucination: default_hallucination_prompt(),
            answer: default_answer_prompt(),
            rewrite: default_rewrite_prompt(),
        }
    }
}

/// Substitute `${key}` placeholders in a template in one pass. Substituted
/// values are never scanned again; unknown placeholders are left as-is.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| {
            let name = &caps[1];
            vars.iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| value.to_string())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

fn default_relevance_prompt() -> String {
    r#"You are a grader assessing the relevance of a retrieved document to a user question.

Here is the retrieved document:

${document}

Here is the user question: ${question}

If the document contains keywords or meaning related to the question, grade it as relevant.
The test does not need to be strict; the goal is to filter out erroneous retrievals.
Give a binary score "yes" or "no" to indicate whether the document is relevant to the question.
Provide the binary score as JSON with a single key "score" and no preamble or explanation."#
        .to_string()
}

fn default_hallucination_prompt() -> String {
    r#"You are a grader assessing whether an answer is grounded in / supported by a set of facts.

Here are the facts:
-------
${documents}
-------
Here is the answer: ${generation}

Give a binary score "yes" or "no" to indicate whether the answer is supported by the set of facts.
Provide the binary score as JSON with a single key "score" and no preamble or explanation."#
        .to_string()
}

fn default_answer_prompt() -> String {
    r#"You are a grader assessing whether an answer is useful to resolve a question.

Here is the answer:
-------
${generation}
-------
Here is the question: ${question}

Give a binary score "yes" or "no" to indicate whether the answer is useful to resolve the question.
Provide the binary score as JSON with a single key "score" and no preamble or explanation."#
        .to_string()
}

fn default_rewrite_prompt() -> String {
    r#"You are a question re-writer that converts an input question into a better version optimized for vector store retrieval.
Look at the initial question and reason about its underlying semantic intent.

Here is the initial question:

${question}

Improved question with no preamble:"#
        .to_string()
}
