//! Sentiment classification — the only external call made while scoring.
//!
//! The scoring engine receives an `Arc<dyn SentimentClassifier>`. In production
//! that is a `ClassifierHandle`, which stays unready until the warm-up task has
//! installed a working backend. Tests inject a stub directly.

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

pub mod inference;

/// Text used for the warm-up classification at startup.
const WARM_UP_TEXT: &str = "I am ready for the interview.";
/// Upper bound on the pause between warm-up attempts.
const MAX_WARM_UP_DELAY: Duration = Duration::from_secs(60);

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("sentiment classifier is not loaded yet")]
    NotReady,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("inference API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("malformed classifier output: {0}")]
    Malformed(String),

    #[error("classifier did not answer within {0:?}")]
    Timeout(std::time::Duration),

    #[error("rate limited after {retries} retries")]
    RateLimited { retries: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SentimentLabel {
    Positive,
    Negative,
}

/// Binary polarity label plus the model's probability for that label.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sentiment {
    pub label: SentimentLabel,
    pub probability: f64,
}

impl Sentiment {
    /// Validates that `probability` lies in `[0, 1]`.
    pub fn new(label: SentimentLabel, probability: f64) -> Result<Self, ClassifierError> {
        if !probability.is_finite() || !(0.0..=1.0).contains(&probability) {
            return Err(ClassifierError::Malformed(format!(
                "probability {probability} outside [0, 1]"
            )));
        }
        Ok(Self { label, probability })
    }

    /// Probability that the text is positive.
    pub fn positive_score(&self) -> f64 {
        match self.label {
            SentimentLabel::Positive => self.probability,
            SentimentLabel::Negative => 1.0 - self.probability,
        }
    }
}

/// A backend that labels text as positive or negative.
#[async_trait]
pub trait SentimentClassifier: Send + Sync {
    async fn classify(&self, text: &str) -> Result<Sentiment, ClassifierError>;
}

/// Readiness-aware slot for the sentiment backend.
///
/// Clones share the same slot. Until a backend is installed every call fails
/// fast with `ClassifierError::NotReady`.
#[derive(Clone, Default)]
pub struct ClassifierHandle {
    slot: Arc<OnceLock<Arc<dyn SentimentClassifier>>>,
}

impl ClassifierHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs the backend. Returns `false` if one was already installed.
    pub fn install(&self, classifier: Arc<dyn SentimentClassifier>) -> bool {
        self.slot.set(classifier).is_ok()
    }

    pub fn is_ready(&self) -> bool {
        self.slot.get().is_some()
    }
}

#[async_trait]
impl SentimentClassifier for ClassifierHandle {
    async fn classify(&self, text: &str) -> Result<Sentiment, ClassifierError> {
        match self.slot.get() {
            Some(classifier) => classifier.classify(text).await,
            None => Err(ClassifierError::NotReady),
        }
    }
}

/// Runs one classification against `classifier` and installs it into `handle`
/// if it succeeds. A failed warm-up leaves the handle unready.
pub async fn warm_up(handle: ClassifierHandle, classifier: Arc<dyn SentimentClassifier>) -> bool {
    match classifier.classify(WARM_UP_TEXT).await {
        Ok(sentiment) => {
            info!(
                "Sentiment classifier ready (warm-up label: {:?})",
                sentiment.label
            );
            handle.install(classifier)
        }
        Err(e) => {
            warn!("Sentiment classifier warm-up failed, scoring will use fallback: {e}");
            false
        }
    }
}

/// Repeats `warm_up` until the handle is ready, doubling the pause between
/// attempts from `initial_delay` up to 60s. Meant to run as a background task.
pub async fn warm_up_until_ready(
    handle: ClassifierHandle,
    classifier: Arc<dyn SentimentClassifier>,
    initial_delay: Duration,
) {
    let mut delay = initial_delay;
    let mut attempt = 1u32;
    while !handle.is_ready() {
        if warm_up(handle.clone(), classifier.clone()).await {
            break;
        }
        info!(
            "Retrying sentiment warm-up (attempt {}) in {}ms",
            attempt + 1,
            delay.as_millis()
        );
        tokio::time::sleep(delay).await;
        delay = (delay * 2).min(MAX_WARM_UP_DELAY);
        attempt += 1;
    }
}
