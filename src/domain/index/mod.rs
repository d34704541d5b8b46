//! Passage index domain models and traits

mod passage;
mod provider;
mod snapshot;

pub use passage::{short_id, Passage, ScoredPassage};
pub use provider::{SnapshotStore, VectorIndex};
pub use snapshot::IndexSnapshot;

#[cfg(test)]
pub use provider::mock::{MockSnapshotStore, MockVectorIndex};
