//! Question answering endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::info;

use crate::api::state::AppState;
use crate::api::types::{
    AnswerRequest, AnswerResponse, ApiError, JobCreated, JobStatusResponse, Json,
    SubmitQuestionRequest,
};

/// POST /v1/questions - Queue a question for asynchronous answering
pub async fn submit_question(
    State(state): State<AppState>,
    Json(request): Json<SubmitQuestionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let job = state
        .job_service
        .submit(&request.question, request.client_id)
        .await?;

    info!(job_id = %job.id(), "Question accepted");

    Ok((StatusCode::ACCEPTED, Json(JobCreated::from(&job))))
}

/// GET /v1/questions/{job_id} - Poll a queued question
pub async fn get_question(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let job = state.job_service.get_status(&job_id).await?;
    let response = JobStatusResponse::from(&job);

    Ok((response.status_code(), Json(response)))
}

/// POST /v1/answer - Answer a question synchronously
pub async fn answer_question(
    State(state): State<AppState>,
    Json(request): Json<AnswerRequest>,
) -> Result<Json<AnswerResponse>, ApiError> {
    let result = state.answer_service.answer(&request.question).await?;

    Ok(Json(AnswerResponse::from(result)))
}
