//! Directory ingestion into a fresh index snapshot

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};
use walkdir::WalkDir;

use super::recursive_split;
use crate::domain::index::{IndexSnapshot, Passage};
use crate::domain::ingestion::{DocumentLoader, IngestionConfig, IngestionReport};
use crate::domain::DomainError;
use crate::infrastructure::embedding::TextEncoder;

/// Walks a data directory, splits every supported file and embeds the
/// chunks in passage mode
#[derive(Debug)]
pub struct IngestionPipeline {
    loader: Arc<dyn DocumentLoader>,
    encoder: TextEncoder,
    config: IngestionConfig,
}

impl IngestionPipeline {
    pub fn new(
        loader: Arc<dyn DocumentLoader>,
        encoder: TextEncoder,
        config: IngestionConfig,
    ) -> Self {
        Self {
            loader,
            encoder,
            config,
        }
    }

    /// Build a snapshot from every file under `data_dir`.
    ///
    /// Files are visited in sorted order so ids are reproducible. Files that
    /// cannot be loaded are skipped and listed in the report; embedding
    /// failures abort the run.
    #[instrument(skip(self, data_dir), fields(data_dir = %data_dir.display()))]
    pub async fn run(
        &self,
        data_dir: &Path,
    ) -> Result<(IndexSnapshot, IngestionReport), DomainError> {
        self.config.validate()?;

        if !data_dir.is_dir() {
            return Err(DomainError::validation(format!(
                "Data directory {} does not exist",
                data_dir.display()
            )));
        }

        let mut snapshot = IndexSnapshot::new();
        let mut report = IngestionReport::default();

        for path in collect_files(data_dir) {
            let source = relative_source(data_dir, &path);

            let text = match self.loader.load(&path).await {
                Ok(text) => text,
                Err(e) => {
                    warn!(source = %source, error = %e, "Skipping file");
                    report.record_skip(source, e.to_string());
                    continue;
                }
            };

            let chunks = recursive_split(&text, &self.config.chunking)?;
            if chunks.is_empty() {
                warn!(source = %source, "Skipping file without text");
                report.record_skip(source, "no extractable text");
                continue;
            }

            self.index_chunks(&mut snapshot, &source, chunks).await?;
            report.files_indexed += 1;
        }

        report.passages = snapshot.len();

        info!(
            files_indexed = report.files_indexed,
            files_skipped = report.files_skipped.len(),
            passages = report.passages,
            "Ingestion finished"
        );

        Ok((snapshot, report))
    }

    async fn index_chunks(
        &self,
        snapshot: &mut IndexSnapshot,
        source: &str,
        chunks: Vec<String>,
    ) -> Result<(), DomainError> {
        debug!(source, chunks = chunks.len(), "Embedding chunks");

        for (batch_no, batch) in chunks.chunks(self.config.embed_batch_size).enumerate() {
            let vectors = self.encoder.encode_passages(batch).await?;
            let first_chunk = batch_no * self.config.embed_batch_size;
            let base_id = snapshot.len() as u64;

            let passages = batch
                .iter()
                .enumerate()
                .map(|(i, text)| {
                    Passage::new(base_id + i as u64, source, first_chunk + i, text.clone())
                })
                .collect();

            snapshot.add(vectors, passages)?;
        }

        Ok(())
    }
}

fn collect_files(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(error = %e, "Skipping unreadable directory entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .collect()
}

/// Path relative to the ingestion root, with `/` separators
fn relative_source(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::embedding::{EncodingPrefixes, MockEmbeddingProvider};
    use crate::domain::index::short_id;
    use crate::domain::ingestion::ChunkingConfig;
    use crate::infrastructure::ingestion::FileDocumentLoader;

    fn pipeline(provider: MockEmbeddingProvider, config: IngestionConfig) -> IngestionPipeline {
        IngestionPipeline::new(
            Arc::new(FileDocumentLoader::default()),
            TextEncoder::new(Arc::new(provider), EncodingPrefixes::default()),
            config,
        )
    }

    fn data_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("b.txt"), "Lyon is in France.").unwrap();
        std::fs::write(dir.path().join("a.md"), "Paris is the capital of France.").unwrap();
        std::fs::write(dir.path().join("nested").join("c.csv"), "city\nRome").unwrap();
        std::fs::write(dir.path().join("sheet.xlsx"), "binary").unwrap();
        std::fs::write(dir.path().join("empty.txt"), "   ").unwrap();
        dir
    }

    #[tokio::test]
    async fn test_run_indexes_supported_files_in_order() {
        let dir = data_dir();
        let pipeline = pipeline(MockEmbeddingProvider::new("mock", 8), IngestionConfig::default());

        let (snapshot, report) = pipeline.run(dir.path()).await.unwrap();

        assert_eq!(report.files_indexed, 3);
        assert_eq!(report.passages, 3);
        assert_eq!(snapshot.dimension(), 8);

        let sources: Vec<&str> = snapshot.passages().iter().map(|p| p.source.as_str()).collect();
        assert_eq!(sources, vec!["a.md", "b.txt", "nested/c.csv"]);

        for (row, passage) in snapshot.passages().iter().enumerate() {
            assert_eq!(passage.id, row as u64);
            assert_eq!(passage.short_id, short_id(&passage.source, passage.chunk_index));
        }

        let skipped: Vec<&str> = report.files_skipped.iter().map(|s| s.path.as_str()).collect();
        assert_eq!(skipped, vec!["empty.txt", "sheet.xlsx"]);
    }

    #[tokio::test]
    async fn test_run_batches_long_documents() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("long.txt"), "abcdefghijklmnopqrst").unwrap();

        let config = IngestionConfig::default()
            .with_chunking(ChunkingConfig::new(4, 0))
            .with_embed_batch_size(2);
        let (snapshot, report) = pipeline(MockEmbeddingProvider::new("mock", 4), config)
            .run(dir.path())
            .await
            .unwrap();

        assert_eq!(report.passages, 5);
        let chunk_indexes: Vec<usize> =
            snapshot.passages().iter().map(|p| p.chunk_index).collect();
        assert_eq!(chunk_indexes, vec![0, 1, 2, 3, 4]);
        assert_eq!(snapshot.passages()[4].text, "qrst");
    }

    #[tokio::test]
    async fn test_run_embeds_in_passage_mode() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), "Paris").unwrap();

        let provider = MockEmbeddingProvider::new("mock", 2)
            .with_vector("passage: Paris", vec![0.0, 3.0])
            .with_vector("Paris", vec![3.0, 0.0]);
        let (snapshot, _) = pipeline(provider, IngestionConfig::default())
            .run(dir.path())
            .await
            .unwrap();

        assert_eq!(snapshot.passages()[0].embedding, vec![0.0, 1.0]);
    }

    #[tokio::test]
    async fn test_embedding_failure_aborts() {
        let dir = data_dir();
        let provider = MockEmbeddingProvider::new("mock", 4).with_error("model not loaded");

        let result = pipeline(provider, IngestionConfig::default()).run(dir.path()).await;

        assert!(matches!(result, Err(DomainError::Provider { .. })));
    }

    #[tokio::test]
    async fn test_missing_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let result = pipeline(MockEmbeddingProvider::new("mock", 4), IngestionConfig::default())
            .run(&dir.path().join("absent"))
            .await;

        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }
}
