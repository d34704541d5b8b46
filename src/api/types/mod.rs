//! API request and response types

pub mod error;
pub mod json;
pub mod question;

pub use error::{ApiError, ApiErrorResponse};
pub use json::Json;
pub use question::{
    AnswerRequest, AnswerResponse, JobCreated, JobStatusResponse, SubmitQuestionRequest,
};
