//! Versioned question answering API

pub mod questions;

use axum::{
    Router,
    routing::{get, post},
};

use super::state::AppState;

/// Create v1 API router
pub fn create_v1_router() -> Router<AppState> {
    Router::new()
        .route("/questions", post(questions::submit_question))
        .route("/questions/{job_id}", get(questions::get_question))
        .route("/answer", post(questions::answer_question))
}
