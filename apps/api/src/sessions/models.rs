use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::scoring::engine::ScoringResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewSession {
    pub id: Uuid,
    pub user_id: String,
    pub job_role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One answered question inside a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QaRecord {
    pub id: Uuid,
    pub session_id: Uuid,
    pub question_id: String,
    pub question: String,
    pub answer: String,
    pub clarity_score: u32,
    pub confidence_score: u32,
    pub relevance_score: u32,
    pub feedback: String,
    pub created_at: DateTime<Utc>,
}

/// Fields needed to record an answer; the store assigns id and timestamp.
#[derive(Debug, Clone)]
pub struct NewQaRecord {
    pub question_id: String,
    pub question: String,
    pub answer: String,
    pub result: ScoringResult,
}

/// Average scores across a session's records, rounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub answered: usize,
    pub clarity: u32,
    pub confidence: u32,
    pub relevance: u32,
}

impl SessionSummary {
    /// All zero for a session without answers.
    pub fn from_records(records: &[QaRecord]) -> Self {
        if records.is_empty() {
            return Self {
                answered: 0,
                clarity: 0,
                confidence: 0,
                relevance: 0,
            };
        }
        let n = records.len() as f64;
        let avg = |f: fn(&QaRecord) -> u32| {
            (records.iter().map(|r| f64::from(f(r))).sum::<f64>() / n).round() as u32
        };
        Self {
            answered: records.len(),
            clarity: avg(|r| r.clarity_score),
            confidence: avg(|r| r.confidence_score),
            relevance: avg(|r| r.relevance_score),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionOverview {
    pub session: InterviewSession,
    pub summary: SessionSummary,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionDetail {
    pub session: InterviewSession,
    pub records: Vec<QaRecord>,
    pub summary: SessionSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(clarity: u32, confidence: u32, relevance: u32) -> QaRecord {
        QaRecord {
            id: Uuid::new_v4(),
            session_id: Uuid::new_v4(),
            question_id: "q".to_string(),
            question: "Q?".to_string(),
            answer: "A".to_string(),
            clarity_score: clarity,
            confidence_score: confidence,
            relevance_score: relevance,
            feedback: "fb".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_summary_of_empty_session_is_zero() {
        let summary = SessionSummary::from_records(&[]);
        assert_eq!(summary.answered, 0);
        assert_eq!(summary.clarity, 0);
        assert_eq!(summary.relevance, 0);
    }

    #[test]
    fn test_summary_rounds_averages() {
        let summary = SessionSummary::from_records(&[record(60, 70, 40), record(61, 90, 100)]);
        assert_eq!(summary.answered, 2);
        // 60.5 rounds up
        assert_eq!(summary.clarity, 61);
        assert_eq!(summary.confidence, 80);
        assert_eq!(summary.relevance, 70);
    }
}
