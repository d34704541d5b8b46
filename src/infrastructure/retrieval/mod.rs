//! Retriever implementations

mod embedding_retriever;

pub use embedding_retriever::EmbeddingRetriever;
