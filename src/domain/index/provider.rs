//! Index access and persistence traits

use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;

use super::{IndexSnapshot, ScoredPassage};
use crate::domain::DomainError;

/// Read access to the passage index currently being served
#[async_trait]
pub trait VectorIndex: Send + Sync + Debug {
    /// Top-k passages for a query vector, best first
    async fn search(&self, query: &[f32], k: usize) -> Result<Vec<ScoredPassage>, DomainError>;

    /// Number of passages currently served
    async fn len(&self) -> usize;

    async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// Durable storage for index snapshots
#[async_trait]
pub trait SnapshotStore: Send + Sync + Debug {
    /// Write the snapshot, replacing any previous one
    async fn persist(&self, snapshot: &IndexSnapshot) -> Result<(), DomainError>;

    /// Read and validate the stored snapshot
    async fn load(&self) -> Result<IndexSnapshot, DomainError>;
}

#[async_trait]
impl<T: VectorIndex + ?Sized> VectorIndex for Arc<T> {
    async fn search(&self, query: &[f32], k: usize) -> Result<Vec<ScoredPassage>, DomainError> {
        (**self).search(query, k).await
    }

    async fn len(&self) -> usize {
        (**self).len().await
    }
}
