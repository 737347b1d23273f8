use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::info;

use crate::errors::AppError;
use crate::matching::MatchOutcome;
use crate::models::matching::{MatchRequest, MatchResponse};
use crate::state::AppState;

/// POST /match (also mounted at /match-jobs)
pub async fn handle_match(
    State(state): State<AppState>,
    payload: Result<Json<MatchRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(req) = payload.map_err(|rejection| match rejection {
        JsonRejection::MissingJsonContentType(_) => {
            AppError::Validation("No JSON data provided".to_string())
        }
        other if other.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            AppError::PayloadTooLarge(format!("Request body too large: {}", other.body_text()))
        }
        other => AppError::Validation(format!("Invalid request body: {}", other.body_text())),
    })?;

    let resume = req
        .resume
        .ok_or_else(|| AppError::Validation("Resume not found in request".to_string()))?;
    let jobs = req
        .jobs
        .ok_or_else(|| AppError::Validation("Jobs not found in request".to_string()))?;
    let top_n = req.top_n.unwrap_or(state.config.default_top_n);

    info!(
        jobs = jobs.len(),
        top_n,
        resume_len = resume.len(),
        "Starting job matching"
    );

    let response = match state.matcher.match_resume(&resume, &jobs, top_n).await? {
        MatchOutcome::Ranked(matches) => (
            StatusCode::OK,
            Json(MatchResponse::matched(&matches, state.config.id_key)),
        )
            .into_response(),
        MatchOutcome::NoResumeText => {
            (StatusCode::BAD_REQUEST, Json(MatchResponse::no_text())).into_response()
        }
    };
    Ok(response)
}
