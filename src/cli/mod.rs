//! CLI module for grounded-rag
//!
//! - `serve`: HTTP API over the persisted index
//! - `ingest`: build the index from a document directory
//! - `ask`: answer one question and print it

pub mod ask;
pub mod ingest;
pub mod serve;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging;

/// Grounded RAG - self-correcting question answering over your documents
#[derive(Parser)]
#[command(name = "grounded-rag")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API
    Serve,

    /// Index every supported document under a directory
    Ingest(ingest::IngestArgs),

    /// Answer a single question on stdout
    Ask(ask::AskArgs),
}

/// Shared start-up: `.env`, configuration, logging
fn bootstrap() -> AppConfig {
    dotenvy::dotenv().ok();

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration, using defaults: {}", e);
            AppConfig::default()
        }
    };

    logging::init_logging(&config.logging);
    config
}
