//! Job-specific errors

use thiserror::Error;

/// Errors that can occur in job handling
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JobError {
    #[error("Invalid job ID: {0}")]
    InvalidId(String),

    #[error("Invalid state transition from '{from}' to '{to}'")]
    InvalidStateTransition { from: String, to: String },
}

impl JobError {
    pub fn invalid_id(message: impl Into<String>) -> Self {
        Self::InvalidId(message.into())
    }

    pub fn invalid_transition(from: &str, to: &str) -> Self {
        Self::InvalidStateTransition {
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}

impl From<JobError> for crate::domain::DomainError {
    fn from(err: JobError) -> Self {
        match err {
            JobError::InvalidId(msg) => Self::invalid_id(msg),
            other => Self::internal(other.to_string()),
        }
    }
}
