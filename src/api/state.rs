//! Application state for shared services

use std::sync::Arc;

use crate::domain::VectorIndex;
use crate::infrastructure::services::{AnswerServiceTrait, JobServiceTrait};

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub answer_service: Arc<dyn AnswerServiceTrait>,
    pub job_service: Arc<dyn JobServiceTrait>,
    pub index: Arc<dyn VectorIndex>,
}

impl AppState {
    pub fn new(
        answer_service: Arc<dyn AnswerServiceTrait>,
        job_service: Arc<dyn JobServiceTrait>,
        index: Arc<dyn VectorIndex>,
    ) -> Self {
        Self {
            answer_service,
            job_service,
            index,
        }
    }
}
