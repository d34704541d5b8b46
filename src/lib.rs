//! Grounded RAG
//!
//! Self-correcting retrieval-augmented question answering over a local
//! document collection:
//! - Ingestion of PDF, DOCX, CSV, text and Markdown files into a persisted
//!   vector index
//! - An answer loop that grades retrieved passages, checks the answer for
//!   hallucinations and rewrites the question until it gets a grounded answer
//! - Input and output guardrails
//! - HTTP API with synchronous answers and asynchronous jobs

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use domain::{
    AnswerGrader, EmbeddingProvider, Generator, HallucinationGrader, IndexSnapshot, LlmProvider,
    QueryRewriter, RelevanceGrader, Retriever, SnapshotStore, VectorIndex,
};
use infrastructure::{
    embedding::{OpenAiEmbeddingProvider, TextEncoder},
    generation::{LlmGenerator, LlmQueryRewriter},
    grading::{LlmAnswerGrader, LlmHallucinationGrader, LlmRelevanceGrader},
    guardrail::Guardrails,
    index::FileSnapshotStore,
    llm::{HttpClient, OpenAiProvider},
    rag::RagController,
    retrieval::EmbeddingRetriever,
    services::AnswerService,
};
use tracing::{info, warn};

/// Chat provider for generation, grading and rewriting
pub fn create_llm_provider(config: &AppConfig) -> anyhow::Result<Arc<dyn LlmProvider>> {
    let client = HttpClient::with_timeout(Duration::from_secs(config.llm.timeout_secs))?;

    Ok(Arc::new(OpenAiProvider::with_base_url(
        client,
        config.llm.api_key.clone(),
        config.llm.base_url.clone(),
    )))
}

/// Query/passage encoder backed by the configured embedding endpoint
pub fn create_text_encoder(config: &AppConfig) -> anyhow::Result<TextEncoder> {
    let client = HttpClient::with_timeout(Duration::from_secs(config.embedding.timeout_secs))?;
    let provider: Arc<dyn EmbeddingProvider> = Arc::new(
        OpenAiEmbeddingProvider::with_base_url(
            client,
            config.embedding.api_key.clone(),
            config.embedding.base_url.clone(),
        )
        .with_model(config.embedding.model.clone()),
    );

    Ok(TextEncoder::new(provider, config.embedding.prefixes.clone())
        .with_model(config.embedding.model.clone()))
}

/// Load the persisted index from `dir`.
///
/// A directory with no snapshot yields an empty index; a snapshot that fails
/// validation is an error.
pub async fn load_index(dir: &Path) -> anyhow::Result<IndexSnapshot> {
    let store = FileSnapshotStore::new(dir);

    if !store.exists() {
        warn!(
            index_dir = %dir.display(),
            "No index found, serving an empty index until one is ingested"
        );
        return Ok(IndexSnapshot::new());
    }

    let snapshot = store.load().await?;
    info!(
        index_dir = %dir.display(),
        passages = snapshot.len(),
        dimension = snapshot.dimension(),
        "Index loaded"
    );

    Ok(snapshot)
}

/// Wire the answer loop and guardrails over the given index
pub fn create_answer_service(
    config: &AppConfig,
    index: Arc<dyn VectorIndex>,
) -> anyhow::Result<AnswerService> {
    config.rag.retrieval.validate()?;

    let llm = create_llm_provider(config)?;
    let encoder = create_text_encoder(config)?;
    let grader_model = config.llm.grader_model();
    let prompts = &config.llm.prompts;

    let retriever: Arc<dyn Retriever> = Arc::new(
        EmbeddingRetriever::new(encoder, index)
            .with_fetch_multiplier(config.rag.retrieval.fetch_multiplier),
    );
    let relevance_grader: Arc<dyn RelevanceGrader> = Arc::new(LlmRelevanceGrader::new(
        llm.clone(),
        grader_model,
        prompts,
    ));
    let hallucination_grader: Arc<dyn HallucinationGrader> = Arc::new(
        LlmHallucinationGrader::new(llm.clone(), grader_model, prompts),
    );
    let answer_grader: Arc<dyn AnswerGrader> =
        Arc::new(LlmAnswerGrader::new(llm.clone(), grader_model, prompts));
    let generator: Arc<dyn Generator> = Arc::new(LlmGenerator::new(
        llm.clone(),
        config.llm.model.clone(),
        config.llm.generation.clone(),
    ));
    let rewriter: Arc<dyn QueryRewriter> = Arc::new(LlmQueryRewriter::new(
        llm,
        grader_model,
        prompts.rewrite.clone(),
    ));

    let controller = RagController::new(
        retriever,
        relevance_grader,
        hallucination_grader,
        answer_grader,
        generator,
        rewriter,
        config.rag.clone(),
    );

    Ok(AnswerService::new(
        Arc::new(controller),
        Guardrails::new(config.guardrails.clone()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::index::Passage;

    #[tokio::test]
    async fn test_load_index_missing_dir_is_empty() {
        let dir = tempfile::tempdir().unwrap();

        let snapshot = load_index(&dir.path().join("index")).await.unwrap();
        assert!(snapshot.is_empty());
    }

    #[tokio::test]
    async fn test_load_index_corrupt_snapshot_is_error() {
        let dir = tempfile::tempdir().unwrap();
        tokio::fs::write(dir.path().join("vectors.bin"), b"garbage")
            .await
            .unwrap();
        tokio::fs::write(dir.path().join("meta.json"), b"[]")
            .await
            .unwrap();

        let err = load_index(dir.path()).await.unwrap_err();
        let domain_err = err.downcast_ref::<domain::DomainError>().unwrap();
        assert!(matches!(domain_err, domain::DomainError::CorruptIndex { .. }));
    }

    #[tokio::test]
    async fn test_load_index_reads_persisted_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = IndexSnapshot::from_parts(
            2,
            vec![vec![1.0, 0.0]],
            vec![Passage::new(1, "geo.txt", 0, "Paris is the capital of France.")],
        )
        .unwrap();
        FileSnapshotStore::new(dir.path())
            .persist(&snapshot)
            .await
            .unwrap();

        let loaded = load_index(dir.path()).await.unwrap();
        assert_eq!(loaded.len(), 1);
    }

    #[test]
    fn test_create_answer_service_with_defaults() {
        let config = AppConfig::default();
        let index: Arc<dyn VectorIndex> =
            Arc::new(infrastructure::index::ActiveIndex::default());

        assert!(create_answer_service(&config, index).is_ok());
    }

    #[test]
    fn test_create_answer_service_rejects_invalid_retrieval() {
        let mut config = AppConfig::default();
        config.rag.retrieval.mmr_lambda = 1.5;
        let index: Arc<dyn VectorIndex> =
            Arc::new(infrastructure::index::ActiveIndex::default());

        assert!(create_answer_service(&config, index).is_err());
    }
}
