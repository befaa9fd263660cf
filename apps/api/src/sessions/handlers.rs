//! Axum route handlers for practice sessions.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::questions::models::Question;
use crate::scoring::engine::ScoringResult;
use crate::sessions::models::{
    InterviewSession, NewQaRecord, QaRecord, SessionDetail, SessionOverview,
};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    pub user_id: String,
    pub job_role: String,
}

#[derive(Debug, Serialize)]
pub struct CreateSessionResponse {
    pub session: InterviewSession,
    pub first_question: Question,
}

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub question_id: String,
    pub answer: String,
}

#[derive(Debug, Serialize)]
pub struct AnswerResponse {
    pub result: ScoringResult,
    pub record: QaRecord,
    pub next_question: Question,
}

#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: String,
}

#[derive(Debug, Serialize)]
pub struct SessionListResponse {
    pub sessions: Vec<SessionOverview>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/sessions
///
/// Starts a practice session for a role and hands out its first question.
pub async fn handle_create_session(
    State(state): State<AppState>,
    Json(request): Json<CreateSessionRequest>,
) -> Result<(StatusCode, Json<CreateSessionResponse>), AppError> {
    if request.user_id.trim().is_empty() {
        return Err(AppError::Validation("user_id cannot be empty".to_string()));
    }
    if state.questions.role(&request.job_role).is_none() {
        return Err(AppError::NotFound(format!(
            "Role {} not found",
            request.job_role
        )));
    }

    let session = state
        .sessions
        .create_session(&request.user_id, &request.job_role)
        .await?;
    let first_question = state.questions.random_question(&session.job_role, &[]);

    Ok((
        StatusCode::CREATED,
        Json(CreateSessionResponse {
            session,
            first_question,
        }),
    ))
}

/// POST /api/v1/sessions/:id/answers
///
/// Scores the answer, records it, and picks a question not yet asked in the session.
pub async fn handle_submit_answer(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<AnswerRequest>,
) -> Result<Json<AnswerResponse>, AppError> {
    let answer = request.answer.trim();
    if answer.is_empty() {
        return Err(AppError::Validation("answer cannot be empty".to_string()));
    }

    let detail = state.sessions.session_detail(session_id).await?;
    let role_id = detail.session.job_role.clone();
    let question = state
        .questions
        .question(&role_id, &request.question_id)
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "Question {} not found for role {role_id}",
                request.question_id
            ))
        })?;

    let result = state.engine.score(answer, question).await;

    let record = state
        .sessions
        .record_answer(
            session_id,
            NewQaRecord {
                question_id: question.id.clone(),
                question: question.text.clone(),
                answer: answer.to_string(),
                result: result.clone(),
            },
        )
        .await?;

    let mut asked: Vec<String> = detail.records.into_iter().map(|r| r.question_id).collect();
    asked.push(question.id.clone());
    let next_question = state.questions.random_question(&role_id, &asked);

    Ok(Json(AnswerResponse {
        result,
        record,
        next_question,
    }))
}

/// GET /api/v1/sessions?user_id=
pub async fn handle_list_sessions(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<SessionListResponse>, AppError> {
    let sessions = state.sessions.list_sessions(&params.user_id).await?;
    Ok(Json(SessionListResponse { sessions }))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionDetail>, AppError> {
    Ok(Json(state.sessions.session_detail(session_id).await?))
}
