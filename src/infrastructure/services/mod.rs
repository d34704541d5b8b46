//! Infrastructure services

mod answer_service;
mod job_service;

pub use answer_service::{AnswerResult, AnswerService, AnswerServiceTrait, AnswerStatus};
pub use job_service::{JobConfig, JobService, JobServiceTrait, JobSweeper};

#[cfg(test)]
pub use answer_service::mock::MockAnswerService;
