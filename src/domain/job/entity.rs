//! Job domain entities

use std::fmt;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::error::JobError;

/// Regex pattern for valid job IDs: job-{uuid}
static ID_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^job-[a-f0-9]{8}-[a-f0-9]{4}-[a-f0-9]{4}-[a-f0-9]{4}-[a-f0-9]{12}$").unwrap()
});

/// Maximum length for job IDs
pub const MAX_ID_LENGTH: usize = 40; // "job-" + 36 char UUID

/// Validated job identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct JobId(String);

impl JobId {
    /// Create a new validated job ID
    pub fn new(id: impl Into<String>) -> Result<Self, JobError> {
        let id = id.into();
        validate_job_id(&id)?;
        Ok(Self(id))
    }

    /// Generate a new job ID with UUID
    pub fn generate() -> Self {
        Self(format!("job-{}", uuid::Uuid::new_v4()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for JobId {
    type Error = JobError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<JobId> for String {
    fn from(id: JobId) -> Self {
        id.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validate a job ID string
pub fn validate_job_id(id: &str) -> Result<(), JobError> {
    if id.is_empty() {
        return Err(JobError::invalid_id("Job ID cannot be empty"));
    }

    if id.len() > MAX_ID_LENGTH {
        return Err(JobError::invalid_id(format!(
            "Job ID exceeds maximum length of {} characters",
            MAX_ID_LENGTH
        )));
    }

    if !ID_PATTERN.is_match(id) {
        return Err(JobError::invalid_id(format!(
            "Invalid job ID '{}': must be in format job-{{uuid}}",
            id
        )));
    }

    Ok(())
}

/// Status of an answer job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Answer is still being computed
    #[default]
    Pending,

    /// Answer is available
    Completed,

    /// The run ended with an error
    Error,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Error)
    }

    /// Only pending jobs can change status
    pub fn can_transition_to(&self, target: JobStatus) -> bool {
        matches!(
            (self, target),
            (Self::Pending, Self::Completed) | (Self::Pending, Self::Error)
        )
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Completed => write!(f, "completed"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// An asynchronous answer request and, once finished, its outcome
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    id: JobId,

    question: String,

    /// Caller-supplied correlation id
    #[serde(skip_serializing_if = "Option::is_none")]
    client_id: Option<String>,

    status: JobStatus,

    #[serde(skip_serializing_if = "Option::is_none")]
    answer: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,

    /// Expiry is measured from here
    created_at: DateTime<Utc>,

    #[serde(skip_serializing_if = "Option::is_none")]
    completed_at: Option<DateTime<Utc>>,
}

impl Job {
    /// Create a new pending job
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            id: JobId::generate(),
            question: question.into(),
            client_id: None,
            status: JobStatus::Pending,
            answer: None,
            error: None,
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// Backdate the job (for testing expiry)
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    // Getters

    pub fn id(&self) -> &JobId {
        &self.id
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn client_id(&self) -> Option<&str> {
        self.client_id.as_deref()
    }

    pub fn status(&self) -> JobStatus {
        self.status
    }

    pub fn answer(&self) -> Option<&str> {
        self.answer.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Mark job as completed with its answer
    pub fn mark_completed(&mut self, answer: impl Into<String>) -> Result<(), JobError> {
        if !self.status.can_transition_to(JobStatus::Completed) {
            return Err(JobError::invalid_transition(
                &self.status.to_string(),
                "completed",
            ));
        }
        self.status = JobStatus::Completed;
        self.answer = Some(answer.into());
        self.completed_at = Some(Utc::now());
        Ok(())
    }

    /// Mark job as failed with an error message
    pub fn mark_failed(&mut self, error: impl Into<String>) -> Result<(), JobError> {
        if !self.status.can_transition_to(JobStatus::Error) {
            return Err(JobError::invalid_transition(&self.status.to_string(), "error"));
        }
        self.status = JobStatus::Error;
        self.error = Some(error.into());
        self.completed_at = Some(Utc::now());
        Ok(())
    }
}
