use std::sync::Arc;

use crate::classifier::ClassifierHandle;
use crate::config::Config;
use crate::questions::bank::QuestionBank;
use crate::scoring::engine::ScoringEngine;
use crate::sessions::store::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub questions: Arc<QuestionBank>,
    /// Readiness of the sentiment model; reported by `/health`.
    pub classifier: ClassifierHandle,
    pub engine: ScoringEngine,
    /// Pluggable session store. Default: InMemorySessionStore.
    pub sessions: Arc<dyn SessionStore>,
}

impl AppState {
    /// Wires the engine to `classifier` with the configured timeout.
    pub fn new(
        config: Config,
        questions: QuestionBank,
        classifier: ClassifierHandle,
        sessions: Arc<dyn SessionStore>,
    ) -> Self {
        let engine = ScoringEngine::new(
            Arc::new(classifier.clone()),
            Some(config.classifier_timeout),
        );
        Self {
            config,
            questions: Arc::new(questions),
            classifier,
            engine,
            sessions,
        }
    }
}
