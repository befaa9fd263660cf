//! Axum route handlers for the question bank.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::questions::models::{Question, RoleSummary};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct NextQuestionQuery {
    /// Comma-separated ids of questions already asked.
    #[serde(default)]
    pub exclude: Option<String>,
}

impl NextQuestionQuery {
    pub fn excluded_ids(&self) -> Vec<String> {
        self.exclude
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[derive(Debug, Serialize)]
pub struct RoleListResponse {
    pub roles: Vec<RoleSummary>,
}

/// GET /api/v1/roles
pub async fn handle_list_roles(State(state): State<AppState>) -> Json<RoleListResponse> {
    let roles = state.questions.roles().iter().map(RoleSummary::from).collect();
    Json(RoleListResponse { roles })
}

/// GET /api/v1/roles/:role_id/questions/next
///
/// Returns a random question for the role that is not listed in `exclude`.
pub async fn handle_next_question(
    State(state): State<AppState>,
    Path(role_id): Path<String>,
    Query(query): Query<NextQuestionQuery>,
) -> Result<Json<Question>, AppError> {
    if state.questions.role(&role_id).is_none() {
        return Err(AppError::NotFound(format!("Role {role_id} not found")));
    }
    Ok(Json(
        state
            .questions
            .random_question(&role_id, &query.excluded_ids()),
    ))
}
