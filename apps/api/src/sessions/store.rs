//! Session storage — pluggable, trait-based.
//!
//! Default: `InMemorySessionStore`, which lives as long as the process.
//! `AppState` holds an `Arc<dyn SessionStore>` so a durable backend can be
//! swapped in without touching the handlers.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::sessions::models::{
    InterviewSession, NewQaRecord, QaRecord, SessionDetail, SessionOverview, SessionSummary,
};

/// Persistence for practice sessions and their answered questions.
///
/// Unknown session ids are reported as `AppError::NotFound`. Durable backends
/// report their own failures (lost connection, failed write) as
/// `AppError::Storage`, which the HTTP layer turns into a 500.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn create_session(&self, user_id: &str, job_role: &str)
        -> Result<InterviewSession, AppError>;

    async fn record_answer(&self, session_id: Uuid, record: NewQaRecord)
        -> Result<QaRecord, AppError>;

    /// The user's sessions, newest first.
    async fn list_sessions(&self, user_id: &str) -> Result<Vec<SessionOverview>, AppError>;

    /// A session with its records, oldest first.
    async fn session_detail(&self, session_id: Uuid) -> Result<SessionDetail, AppError>;
}

#[derive(Debug)]
struct SessionEntry {
    session: InterviewSession,
    records: Vec<QaRecord>,
}

#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<Uuid, SessionEntry>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn not_found(session_id: Uuid) -> AppError {
    AppError::NotFound(format!("Session {session_id} not found"))
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create_session(
        &self,
        user_id: &str,
        job_role: &str,
    ) -> Result<InterviewSession, AppError> {
        let now = Utc::now();
        let session = InterviewSession {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            job_role: job_role.to_string(),
            created_at: now,
            updated_at: now,
        };

        self.sessions.write().await.insert(
            session.id,
            SessionEntry {
                session: session.clone(),
                records: Vec::new(),
            },
        );

        info!("Created session {} ({job_role}) for user {user_id}", session.id);
        Ok(session)
    }

    async fn record_answer(
        &self,
        session_id: Uuid,
        record: NewQaRecord,
    ) -> Result<QaRecord, AppError> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions
            .get_mut(&session_id)
            .ok_or_else(|| not_found(session_id))?;
        let now = Utc::now();
        let row = QaRecord {
            id: Uuid::new_v4(),
            session_id,
            question_id: record.question_id,
            question: record.question,
            answer: record.answer,
            clarity_score: record.result.clarity_score,
            confidence_score: record.result.confidence_score,
            relevance_score: record.result.relevance_score,
            feedback: record.result.feedback,
            created_at: now,
        };
        entry.session.updated_at = now;
        entry.records.push(row.clone());
        Ok(row)
    }

    async fn list_sessions(&self, user_id: &str) -> Result<Vec<SessionOverview>, AppError> {
        let sessions = self.sessions.read().await;
        let mut overviews: Vec<SessionOverview> = sessions
            .values()
            .filter(|entry| entry.session.user_id == user_id)
            .map(|entry| SessionOverview {
                session: entry.session.clone(),
                summary: SessionSummary::from_records(&entry.records),
            })
            .collect();
        overviews.sort_by(|a, b| b.session.created_at.cmp(&a.session.created_at));
        Ok(overviews)
    }

    async fn session_detail(&self, session_id: Uuid) -> Result<SessionDetail, AppError> {
        let sessions = self.sessions.read().await;
        let entry = sessions.get(&session_id).ok_or_else(|| not_found(session_id))?;
        Ok(SessionDetail {
            session: entry.session.clone(),
            records: entry.records.clone(),
            summary: SessionSummary::from_records(&entry.records),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::engine::ScoringResult;

    fn new_record(question_id: &str, clarity: u32) -> NewQaRecord {
        NewQaRecord {
            question_id: question_id.to_string(),
            question: format!("Question {question_id}?"),
            answer: "An answer".to_string(),
            result: ScoringResult {
                clarity_score: clarity,
                confidence_score: 70,
                relevance_score: 80,
                feedback: "Keep going.".to_string(),
                reference_answer: None,
                point_coverage: None,
            },
        }
    }

    #[tokio::test]
    async fn test_record_and_read_back_in_order() {
        let store = InMemorySessionStore::new();
        let session = store.create_session("user-1", "software-engineer").await.unwrap();

        store.record_answer(session.id, new_record("se-1", 40)).await.unwrap();
        store.record_answer(session.id, new_record("se-2", 80)).await.unwrap();

        let detail = store.session_detail(session.id).await.unwrap();
        let ids: Vec<&str> = detail.records.iter().map(|r| r.question_id.as_str()).collect();
        assert_eq!(ids, vec!["se-1", "se-2"]);
        assert_eq!(detail.summary.answered, 2);
        assert_eq!(detail.summary.clarity, 60);
        assert!(detail.session.updated_at >= detail.session.created_at);
    }

    #[tokio::test]
    async fn test_record_to_unknown_session_is_not_found() {
        let store = InMemorySessionStore::new();
        let err = store
            .record_answer(Uuid::new_v4(), new_record("se-1", 40))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert!(matches!(
            store.session_detail(Uuid::new_v4()).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_list_sessions_filters_by_user_newest_first() {
        let store = InMemorySessionStore::new();
        let first = store.create_session("alice", "data-scientist").await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let second = store.create_session("alice", "product-manager").await.unwrap();
        store.create_session("bob", "data-scientist").await.unwrap();

        let listed = store.list_sessions("alice").await.unwrap();
        let ids: Vec<Uuid> = listed.iter().map(|o| o.session.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
        assert!(store.list_sessions("carol").await.unwrap().is_empty());
    }
}
