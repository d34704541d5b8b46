//! Question and job API types

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::domain::{Job, JobStatus};
use crate::infrastructure::services::{AnswerResult, AnswerStatus};

/// Body of `POST /v1/questions`
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitQuestionRequest {
    pub question: String,
    #[serde(default)]
    pub client_id: Option<String>,
}

/// Response when a job is accepted (HTTP 202)
#[derive(Debug, Clone, Serialize)]
pub struct JobCreated {
    pub job_id: String,
    pub status: JobStatus,
}

impl From<&Job> for JobCreated {
    fn from(job: &Job) -> Self {
        Self {
            job_id: job.id().to_string(),
            status: job.status(),
        }
    }
}

/// Response for `GET /v1/questions/{job_id}`
#[derive(Debug, Clone, Serialize)]
pub struct JobStatusResponse {
    pub status: JobStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl JobStatusResponse {
    /// HTTP status matching the job state
    pub fn status_code(&self) -> StatusCode {
        match self.status {
            JobStatus::Pending => StatusCode::ACCEPTED,
            JobStatus::Completed => StatusCode::OK,
            JobStatus::Error => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<&Job> for JobStatusResponse {
    fn from(job: &Job) -> Self {
        Self {
            status: job.status(),
            answer: job.answer().map(String::from),
            message: job.error().map(String::from),
        }
    }
}

/// Body of `POST /v1/answer`
#[derive(Debug, Clone, Deserialize)]
pub struct AnswerRequest {
    pub question: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnswerResponse {
    pub answer: String,
    pub attempts: u32,
    pub status: AnswerStatus,
}

impl From<AnswerResult> for AnswerResponse {
    fn from(result: AnswerResult) -> Self {
        Self {
            answer: result.text,
            attempts: result.attempts,
            status: result.status,
        }
    }
}
