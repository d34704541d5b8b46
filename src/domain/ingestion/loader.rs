//! Document loader trait

use std::fmt::Debug;
use std::path::Path;

use async_trait::async_trait;

use crate::domain::DomainError;

/// Extracts the plain text of a source document
#[async_trait]
pub trait DocumentLoader: Send + Sync + Debug {
    /// Fails with `UnsupportedFormat` for extensions the loader does not handle
    async fn load(&self, path: &Path) -> Result<String, DomainError>;
}
