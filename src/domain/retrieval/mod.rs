//! Retrieval domain: diversified top-k search over the passage index

mod config;
mod mmr;
mod retriever;

pub use config::RetrievalConfig;
pub use mmr::{dedup_by_id, mmr_select};
pub use retriever::Retriever;

#[cfg(test)]
pub use retriever::mock::MockRetriever;
