//! Self-correcting answer loop

mod controller;

pub use controller::RagController;
