pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::questions::handlers as questions;
use crate::scoring::handlers as scoring;
use crate::sessions::handlers as sessions;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Question bank
        .route("/api/v1/roles", get(questions::handle_list_roles))
        .route(
            "/api/v1/roles/:role_id/questions/next",
            get(questions::handle_next_question),
        )
        // Scoring
        .route("/api/v1/score", post(scoring::handle_score))
        // Practice sessions
        .route(
            "/api/v1/sessions",
            get(sessions::handle_list_sessions).post(sessions::handle_create_session),
        )
        .route("/api/v1/sessions/:id", get(sessions::handle_get_session))
        .route(
            "/api/v1/sessions/:id/answers",
            post(sessions::handle_submit_answer),
        )
        .with_state(state)
}
