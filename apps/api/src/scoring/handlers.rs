//! Axum route handler for one-off answer scoring.

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::errors::AppError;
use crate::scoring::engine::ScoringResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ScoreRequest {
    pub role_id: String,
    pub question_id: String,
    pub answer: String,
}

/// POST /api/v1/score
///
/// Scores an answer to a bank question without recording it.
pub async fn handle_score(
    State(state): State<AppState>,
    Json(request): Json<ScoreRequest>,
) -> Result<Json<ScoringResult>, AppError> {
    let answer = request.answer.trim();
    if answer.is_empty() {
        return Err(AppError::Validation("answer cannot be empty".to_string()));
    }

    let question = state
        .questions
        .question(&request.role_id, &request.question_id)
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "Question {} not found for role {}",
                request.question_id, request.role_id
            ))
        })?;

    Ok(Json(state.engine.score(answer, question).await))
}
