//! Document ingestion: loading, splitting, embedding, indexing

mod loader;
mod pipeline;
mod splitter;

pub use loader::FileDocumentLoader;
pub use pipeline::IngestionPipeline;
pub use splitter::recursive_split;
