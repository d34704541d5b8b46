//! Self-correcting answer loop: states, events and per-question bookkeeping

mod config;
mod outcome;
mod question;
mod state;

pub use config::RagConfig;
pub use outcome::{RagOutcome, RagStatus};
pub use question::Question;
pub use state::{RagEvent, RagState};
