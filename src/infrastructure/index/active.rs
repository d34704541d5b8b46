//! The snapshot currently being served

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::info;

use crate::domain::index::{IndexSnapshot, ScoredPassage, VectorIndex};
use crate::domain::DomainError;

/// Shared handle to the live index snapshot.
///
/// Searches clone the inner `Arc` and run without holding the lock, so a
/// `swap` never waits for in-flight searches and never mutates a snapshot
/// someone is reading.
#[derive(Debug, Default)]
pub struct ActiveIndex {
    current: RwLock<Arc<IndexSnapshot>>,
}

impl ActiveIndex {
    pub fn new(snapshot: IndexSnapshot) -> Self {
        Self {
            current: RwLock::new(Arc::new(snapshot)),
        }
    }

    /// The snapshot in service right now
    pub async fn snapshot(&self) -> Arc<IndexSnapshot> {
        self.current.read().await.clone()
    }

    /// Publish a new snapshot, returning the one it replaces
    pub async fn swap(&self, snapshot: IndexSnapshot) -> Arc<IndexSnapshot> {
        let passages = snapshot.len();
        let previous = std::mem::replace(&mut *self.current.write().await, Arc::new(snapshot));

        info!(
            passages,
            previous_passages = previous.len(),
            "Index snapshot swapped"
        );

        previous
    }
}

#[async_trait]
impl VectorIndex for ActiveIndex {
    async fn search(&self, query: &[f32], k: usize) -> Result<Vec<ScoredPassage>, DomainError> {
        let snapshot = self.snapshot().await;
        snapshot.search(query, k)
    }

    async fn len(&self) -> usize {
        self.snapshot().await.len()
    }
}
