//! Infrastructure layer - External service implementations

pub mod embedding;
pub mod generation;
pub mod grading;
pub mod guardrail;
pub mod index;
pub mod ingestion;
pub mod job;
pub mod llm;
pub mod logging;
pub mod observability;
pub mod rag;
pub mod retrieval;
pub mod services;
