//! Ingest command - builds and persists the passage index

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Args;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::domain::{IngestionReport, SnapshotStore};
use crate::infrastructure::index::FileSnapshotStore;
use crate::infrastructure::ingestion::{FileDocumentLoader, IngestionPipeline};

#[derive(Args, Clone, Debug)]
pub struct IngestArgs {
    /// Directory scanned for documents (overrides config)
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Directory the index is written to (overrides config)
    #[arg(long)]
    pub index_dir: Option<PathBuf>,
}

impl IngestArgs {
    fn resolve(&self, config: &AppConfig) -> (PathBuf, PathBuf) {
        let data_dir = self
            .data_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(&config.ingestion.data_dir));
        let index_dir = self
            .index_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(&config.index.dir));
        (data_dir, index_dir)
    }
}

/// Run ingestion and print the report as JSON on stdout
pub async fn run(args: IngestArgs) -> anyhow::Result<()> {
    let config = super::bootstrap();
    let (data_dir, index_dir) = args.resolve(&config);

    let report = ingest(&config, &data_dir, &index_dir).await?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

async fn ingest(
    config: &AppConfig,
    data_dir: &Path,
    index_dir: &Path,
) -> anyhow::Result<IngestionReport> {
    let loader = Arc::new(FileDocumentLoader::new(config.ingestion.csv_max_rows));
    let encoder = crate::create_text_encoder(config)?;
    let pipeline = IngestionPipeline::new(loader, encoder, config.ingestion.clone());

    let (snapshot, report) = pipeline.run(data_dir).await?;

    for skipped in &report.files_skipped {
        warn!(path = %skipped.path, reason = %skipped.reason, "File skipped");
    }

    FileSnapshotStore::new(index_dir).persist(&snapshot).await?;

    info!(
        files_indexed = report.files_indexed,
        files_skipped = report.files_skipped.len(),
        passages = report.passages,
        index_dir = %index_dir.display(),
        "Ingestion complete"
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let args = IngestArgs {
            data_dir: Some(PathBuf::from("docs")),
            index_dir: None,
        };

        let (data_dir, index_dir) = args.resolve(&AppConfig::default());
        assert_eq!(data_dir, PathBuf::from("docs"));
        assert_eq!(index_dir, PathBuf::from("index"));
    }

    #[tokio::test]
    async fn test_missing_data_dir_fails_before_writing() {
        let dir = tempfile::tempdir().unwrap();
        let index_dir = dir.path().join("index");

        let result = ingest(
            &AppConfig::default(),
            &dir.path().join("does-not-exist"),
            &index_dir,
        )
        .await;

        assert!(result.is_err());
        assert!(!index_dir.exists());
    }
}
