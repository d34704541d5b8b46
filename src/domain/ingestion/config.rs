//! Chunking and ingestion configuration

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Sliding-window chunking parameters, in characters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Window length
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    /// Characters shared by consecutive windows
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,
}

fn default_chunk_size() -> usize {
    1200
}

fn default_chunk_overlap() -> usize {
    200
}

impl ChunkingConfig {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self {
            chunk_size,
            chunk_overlap,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.chunk_size == 0 {
            return Err(DomainError::validation("chunk_size must be greater than 0"));
        }

        if self.chunk_overlap >= self.chunk_size {
            return Err(DomainError::validation(
                "chunk_overlap must be less than chunk_size",
            ));
        }

        Ok(())
    }

    /// Distance between the starts of consecutive windows
    pub fn step(&self) -> usize {
        self.chunk_size.saturating_sub(self.chunk_overlap).max(1)
    }
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
        }
    }
}

/// Ingestion pipeline configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestionConfig {
    /// Directory scanned for source documents
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default)]
    pub chunking: ChunkingConfig,
    /// Chunks sent per embedding request
    #[serde(default = "default_embed_batch_size")]
    pub embed_batch_size: usize,
    /// CSV files are cut after this many data rows
    #[serde(default = "default_csv_max_rows")]
    pub csv_max_rows: usize,
}

fn default_data_dir() -> String {
    "data".to_string()
}

fn default_embed_batch_size() -> usize {
    32
}

fn default_csv_max_rows() -> usize {
    50_000
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            chunking: ChunkingConfig::default(),
            embed_batch_size: default_embed_batch_size(),
            csv_max_rows: default_csv_max_rows(),
        }
    }
}

impl IngestionConfig {
    pub fn with_chunking(mut self, chunking: ChunkingConfig) -> Self {
        self.chunking = chunking;
        self
    }

    pub fn with_embed_batch_size(mut self, size: usize) -> Self {
        self.embed_batch_size = size;
        self
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        self.chunking.validate()?;

        if self.embed_batch_size == 0 {
            return Err(DomainError::validation("embed_batch_size must be at least 1"));
        }

        Ok(())
    }
}
