//! Response scoring engine.
//!
//! `ScoringEngine::score` never fails: if the sentiment classifier errors,
//! times out or is not loaded, the caller gets `ScoringResult::fallback`.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::classifier::{ClassifierError, Sentiment, SentimentClassifier};
use crate::questions::models::Question;
use crate::scoring::feedback::{build_feedback, ScoreCard};
use crate::scoring::metrics::{clarity_score, confidence_score, point_is_covered, relevance_score};

pub const FALLBACK_CLARITY: u32 = 75;
pub const FALLBACK_CONFIDENCE: u32 = 70;
pub const FALLBACK_RELEVANCE: u32 = 80;
pub const FALLBACK_FEEDBACK: &str =
    "Analysis temporarily unavailable. Keep practicing to improve your interview skills!";

/// Whether one expected point was touched on by the answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointCoverage {
    pub label: String,
    pub covered: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringResult {
    pub clarity_score: u32,
    pub confidence_score: u32,
    pub relevance_score: u32,
    pub feedback: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_answer: Option<String>,
    /// One entry per expected point, in the question's order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub point_coverage: Option<Vec<PointCoverage>>,
}

impl ScoringResult {
    /// Fixed result returned when the classifier is unavailable.
    pub fn fallback(question: &Question) -> Self {
        Self {
            clarity_score: FALLBACK_CLARITY,
            confidence_score: FALLBACK_CONFIDENCE,
            relevance_score: FALLBACK_RELEVANCE,
            feedback: FALLBACK_FEEDBACK.to_string(),
            reference_answer: reference_answer(question),
            point_coverage: None,
        }
    }
}

/// Reference answer to attach, only for direct questions that have one.
fn reference_answer(question: &Question) -> Option<String> {
    if question.kind.is_direct() {
        question.reference_answer.clone()
    } else {
        None
    }
}

/// Per-point coverage for non-direct questions with at least one expected point.
pub fn point_coverage(answer: &str, question: &Question) -> Option<Vec<PointCoverage>> {
    if question.kind.is_direct() || question.points().is_empty() {
        return None;
    }
    let answer_lower = answer.to_lowercase();
    Some(
        question
            .points()
            .iter()
            .map(|point| PointCoverage {
                label: point.clone(),
                covered: point_is_covered(&answer_lower, point),
            })
            .collect(),
    )
}

/// Scores an answer given the classifier's verdict on it. Pure.
pub fn score_with_sentiment(
    answer: &str,
    question: &Question,
    sentiment: &Sentiment,
) -> ScoringResult {
    let scores = ScoreCard {
        clarity: clarity_score(answer),
        confidence: confidence_score(sentiment),
        relevance: relevance_score(answer, question),
    };

    ScoringResult {
        clarity_score: scores.clarity,
        confidence_score: scores.confidence,
        relevance_score: scores.relevance,
        feedback: build_feedback(question.kind, scores, answer),
        reference_answer: reference_answer(question),
        point_coverage: point_coverage(answer, question),
    }
}

/// Scores answers using an injected sentiment classifier.
///
/// Holds no mutable state; one engine can serve concurrent requests.
#[derive(Clone)]
pub struct ScoringEngine {
    classifier: Arc<dyn SentimentClassifier>,
    timeout: Option<Duration>,
}

impl ScoringEngine {
    pub fn new(classifier: Arc<dyn SentimentClassifier>, timeout: Option<Duration>) -> Self {
        Self {
            classifier,
            timeout,
        }
    }

    /// Scores `answer` against `question`. Callers must not pass blank answers.
    pub async fn score(&self, answer: &str, question: &Question) -> ScoringResult {
        match self.classify(answer).await {
            Ok(sentiment) => {
                let result = score_with_sentiment(answer, question, &sentiment);
                debug!(
                    "Scored answer to {}: clarity={}, confidence={}, relevance={}",
                    question.id,
                    result.clarity_score,
                    result.confidence_score,
                    result.relevance_score
                );
                result
            }
            Err(e) => {
                warn!("Scoring {} with fallback: {e}", question.id);
                ScoringResult::fallback(question)
            }
        }
    }

    async fn classify(&self, answer: &str) -> Result<Sentiment, ClassifierError> {
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.classifier.classify(answer))
                .await
                .map_err(|_| ClassifierError::Timeout(limit))?,
            None => self.classifier.classify(answer).await,
        }
    }
}
