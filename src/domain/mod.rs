//! Domain layer - Core business logic and entities

pub mod embedding;
pub mod error;
pub mod generation;
pub mod grading;
pub mod guardrail;
pub mod index;
pub mod ingestion;
pub mod job;
pub mod llm;
pub mod rag;
pub mod retrieval;

pub use embedding::{EmbeddingProvider, EncodingMode, EncodingPrefixes};
pub use error::DomainError;
pub use generation::{Answer, GenerationConfig, Generator, QueryRewriter};
pub use grading::{
    AnswerGrader, GradingPrompts, Grounding, HallucinationGrader, Relevance, RelevanceGrader,
    Usefulness,
};
pub use guardrail::{GuardrailConfig, RejectionReason};
pub use index::{IndexSnapshot, Passage, ScoredPassage, SnapshotStore, VectorIndex};
pub use ingestion::{
    ChunkingConfig, DocumentFormat, DocumentLoader, IngestionConfig, IngestionReport,
};
pub use job::{Job, JobError, JobId, JobRepository, JobStatus};
pub use llm::{LlmProvider, LlmRequest, LlmResponse, Message, MessageRole};
pub use rag::{Question, RagConfig, RagEvent, RagOutcome, RagState, RagStatus};
pub use retrieval::{RetrievalConfig, Retriever};
