//! Input and output safety rules

mod config;
mod rejection;

pub use config::GuardrailConfig;
pub use rejection::RejectionReason;
