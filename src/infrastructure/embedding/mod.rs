//! Embedding provider implementations

mod encoder;
mod openai;

pub use encoder::TextEncoder;
pub use openai::OpenAiEmbeddingProvider;

// Re-export HTTP client for use by embedding providers
pub use super::llm::{HttpClient, HttpClientTrait};
