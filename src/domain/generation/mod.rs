//! Answer generation and query reformulation

mod answer;
mod citation;
mod config;
mod generator;

pub use answer::Answer;
pub use citation::cited_ids;
pub use config::GenerationConfig;
pub use generator::{Generator, QueryRewriter};

#[cfg(test)]
pub use generator::mock::{MockGenerator, MockQueryRewriter};
