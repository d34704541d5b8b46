//! Document ingestion domain types and traits
//!
//! This module provides:
//! - `DocumentFormat` detection from file extensions
//! - `DocumentLoader` trait turning a file into plain text
//! - Configuration and report types for the ingestion pipeline

pub mod config;
pub mod format;
pub mod loader;
pub mod report;

pub use config::{ChunkingConfig, IngestionConfig};
pub use format::DocumentFormat;
pub use loader::DocumentLoader;
pub use report::{IngestionReport, SkippedFile};

#[cfg(test)]
pub use loader::mock::MockDocumentLoader;
