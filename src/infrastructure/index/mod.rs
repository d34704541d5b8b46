//! Passage index implementations

mod active;
mod file_store;

pub use active::ActiveIndex;
pub use file_store::{FileSnapshotStore, META_FILE, VECTORS_FILE};
