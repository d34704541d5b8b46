//! Regex-based input and output guardrails

mod rules;

pub use rules::Guardrails;
