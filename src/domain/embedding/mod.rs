//! Embedding provider domain models and traits

mod batch;
mod mode;
mod provider;
mod vector;

pub use batch::{EmbeddingRequest, EmbeddingResponse};
pub use mode::{EncodingMode, EncodingPrefixes};
pub use provider::EmbeddingProvider;
pub use vector::{cosine_similarity, dot, l2_normalize};

#[cfg(test)]
pub use provider::mock::MockEmbeddingProvider;
