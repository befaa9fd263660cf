//! HTTP sentiment backend for a hosted text-classification model
//! (Hugging Face inference API compatible).
//!
//! Request: `POST {"inputs": "<text>"}`.
//! Response: `[[{"label": "POSITIVE", "score": 0.99}, ...]]` or the flat
//! `[{"label": ..., "score": ...}]` form. The top-scoring label wins.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::classifier::{ClassifierError, Sentiment, SentimentClassifier, SentimentLabel};

const MAX_RETRIES: u32 = 3;
const REQUEST_TIMEOUT_SECS: u64 = 30;
const RETRY_BASE_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
}

#[derive(Debug, Deserialize)]
struct LabelScore {
    label: String,
    score: f64,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InferenceResponse {
    Nested(Vec<Vec<LabelScore>>),
    Flat(Vec<LabelScore>),
}

#[derive(Debug, Deserialize)]
struct InferenceApiError {
    error: String,
}

#[derive(Clone)]
pub struct InferenceClassifier {
    client: Client,
    endpoint: String,
    api_token: Option<String>,
    retry_base_delay: Duration,
}

impl InferenceClassifier {
    pub fn new(endpoint: String, api_token: Option<String>) -> Result<Self, ClassifierError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            endpoint,
            api_token,
            retry_base_delay: RETRY_BASE_DELAY,
        })
    }

    #[cfg(test)]
    fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = delay;
        self
    }

    /// Sends one request, retrying 429 and 5xx with exponential backoff.
    ///
    /// When every attempt was throttled the error is `RateLimited`; otherwise
    /// the last failure is returned as is.
    async fn call(&self, text: &str) -> Result<String, ClassifierError> {
        let request_body = InferenceRequest { inputs: text };
        let mut last_error: Option<ClassifierError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // 500ms, 1s
                let delay = self.retry_base_delay * (1 << (attempt - 1));
                warn!(
                    "Sentiment call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let mut request = self.client.post(&self.endpoint).json(&request_body);
            if let Some(token) = &self.api_token {
                request = request.bearer_auth(token);
            }

            let response = match request.send().await {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(ClassifierError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("Sentiment API returned {}: {}", status, body);
                last_error = Some(ClassifierError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<InferenceApiError>(&body)
                    .map(|e| e.error)
                    .unwrap_or(body);
                return Err(ClassifierError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            return Ok(response.text().await?);
        }

        match last_error {
            None | Some(ClassifierError::Api { status: 429, .. }) => {
                Err(ClassifierError::RateLimited {
                    retries: MAX_RETRIES,
                })
            }
            Some(e) => Err(e),
        }
    }
}

#[async_trait]
impl SentimentClassifier for InferenceClassifier {
    async fn classify(&self, text: &str) -> Result<Sentiment, ClassifierError> {
        let body = self.call(text).await?;
        let sentiment = parse_inference_body(&body)?;
        debug!(
            "Sentiment classified: label={:?}, probability={:.3}",
            sentiment.label, sentiment.probability
        );
        Ok(sentiment)
    }
}

/// Extracts the top label from a classification response body.
fn parse_inference_body(body: &str) -> Result<Sentiment, ClassifierError> {
    let parsed: InferenceResponse = serde_json::from_str(body)
        .map_err(|e| ClassifierError::Malformed(format!("unexpected response shape: {e}")))?;

    let candidates = match parsed {
        InferenceResponse::Nested(batches) => batches.into_iter().next().unwrap_or_default(),
        InferenceResponse::Flat(entries) => entries,
    };

    let best = candidates
        .into_iter()
        .filter(|c| c.score.is_finite())
        .max_by(|a, b| a.score.total_cmp(&b.score))
        .ok_or_else(|| ClassifierError::Malformed("no labels returned".to_string()))?;

    Sentiment::new(parse_label(&best.label)?, best.score)
}

fn parse_label(raw: &str) -> Result<SentimentLabel, ClassifierError> {
    match raw.to_ascii_uppercase().as_str() {
        "POSITIVE" | "POS" | "LABEL_1" => Ok(SentimentLabel::Positive),
        "NEGATIVE" | "NEG" | "LABEL_0" => Ok(SentimentLabel::Negative),
        other => Err(ClassifierError::Malformed(format!("unknown label '{other}'"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use axum::extract::State;
    use axum::http::{header::AUTHORIZATION, HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::Router;

    const POSITIVE_BODY: &str = r#"[[{"label":"POSITIVE","score":0.91}]]"#;

    /// Local model server that replays a fixed list of replies, repeating the
    /// last one, and records what it received.
    #[derive(Clone)]
    struct ScriptedModel {
        replies: Arc<Vec<(StatusCode, &'static str)>>,
        hits: Arc<AtomicUsize>,
        auth_headers: Arc<Mutex<Vec<Option<String>>>>,
    }

    impl ScriptedModel {
        fn hits(&self) -> usize {
            self.hits.load(Ordering::SeqCst)
        }
    }

    async fn reply(State(model): State<ScriptedModel>, headers: HeaderMap) -> (StatusCode, String) {
        let hit = model.hits.fetch_add(1, Ordering::SeqCst);
        let auth = headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        model.auth_headers.lock().unwrap().push(auth);
        let (status, body) = model.replies[hit.min(model.replies.len() - 1)];
        (status, body.to_string())
    }

    async fn spawn_model(
        replies: Vec<(StatusCode, &'static str)>,
        api_token: Option<&str>,
    ) -> (InferenceClassifier, ScriptedModel) {
        let model = ScriptedModel {
            replies: Arc::new(replies),
            hits: Arc::new(AtomicUsize::new(0)),
            auth_headers: Arc::new(Mutex::new(Vec::new())),
        };
        let app = Router::new()
            .route("/classify", post(reply))
            .with_state(model.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

        let classifier = InferenceClassifier::new(
            format!("http://{addr}/classify"),
            api_token.map(str::to_string),
        )
        .unwrap()
        .with_retry_delay(Duration::from_millis(5));
        (classifier, model)
    }

    #[tokio::test]
    async fn test_server_error_is_retried_with_bearer_token() {
        let (classifier, model) = spawn_model(
            vec![
                (StatusCode::SERVICE_UNAVAILABLE, r#"{"error":"loading"}"#),
                (StatusCode::OK, POSITIVE_BODY),
            ],
            Some("secret"),
        )
        .await;

        let sentiment = classifier.classify("I led the migration.").await.unwrap();

        assert_eq!(sentiment.label, SentimentLabel::Positive);
        assert_eq!(model.hits(), 2);
        let auth = model.auth_headers.lock().unwrap().clone();
        assert_eq!(auth, vec![Some("Bearer secret".to_string()); 2]);
    }

    #[tokio::test]
    async fn test_no_authorization_header_without_token() {
        let (classifier, model) = spawn_model(vec![(StatusCode::OK, POSITIVE_BODY)], None).await;

        classifier.classify("hello").await.unwrap();

        assert_eq!(*model.auth_headers.lock().unwrap(), vec![None]);
    }

    #[tokio::test]
    async fn test_persistent_server_error_gives_up_after_max_retries() {
        let (classifier, model) =
            spawn_model(vec![(StatusCode::SERVICE_UNAVAILABLE, "overloaded")], None).await;

        let err = classifier.classify("hello").await.unwrap_err();

        assert!(matches!(err, ClassifierError::Api { status: 503, .. }));
        assert_eq!(model.hits(), MAX_RETRIES as usize);
    }

    #[tokio::test]
    async fn test_client_error_is_not_retried() {
        let (classifier, model) =
            spawn_model(vec![(StatusCode::BAD_REQUEST, r#"{"error":"bad input"}"#)], None).await;

        let err = classifier.classify("hello").await.unwrap_err();

        match err {
            ClassifierError::Api { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "bad input");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
        assert_eq!(model.hits(), 1);
    }

    #[tokio::test]
    async fn test_throttling_on_every_attempt_is_rate_limited() {
        let (classifier, model) =
            spawn_model(vec![(StatusCode::TOO_MANY_REQUESTS, "slow down")], None).await;

        let err = classifier.classify("hello").await.unwrap_err();

        assert!(matches!(
            err,
            ClassifierError::RateLimited {
                retries: MAX_RETRIES
            }
        ));
        assert_eq!(model.hits(), MAX_RETRIES as usize);
    }

    #[test]
    fn test_parse_nested_response_picks_top_label() {
        let body = r#"[[{"label":"NEGATIVE","score":0.12},{"label":"POSITIVE","score":0.88}]]"#;
        let sentiment = parse_inference_body(body).unwrap();
        assert_eq!(sentiment.label, SentimentLabel::Positive);
        assert!((sentiment.probability - 0.88).abs() < 1e-9);
    }

    #[test]
    fn test_parse_flat_response() {
        let body = r#"[{"label":"NEGATIVE","score":0.97}]"#;
        let sentiment = parse_inference_body(body).unwrap();
        assert_eq!(sentiment.label, SentimentLabel::Negative);
    }

    #[test]
    fn test_parse_generic_label_names() {
        assert_eq!(parse_label("LABEL_1").unwrap(), SentimentLabel::Positive);
        assert_eq!(parse_label("label_0").unwrap(), SentimentLabel::Negative);
        assert!(parse_label("NEUTRAL").is_err());
    }

    #[test]
    fn test_parse_rejects_empty_and_garbage() {
        assert!(matches!(
            parse_inference_body("[[]]"),
            Err(ClassifierError::Malformed(_))
        ));
        assert!(matches!(
            parse_inference_body(r#"{"error":"loading"}"#),
            Err(ClassifierError::Malformed(_))
        ));
    }

    #[test]
    fn test_parse_rejects_out_of_range_score() {
        let body = r#"[{"label":"POSITIVE","score":3.5}]"#;
        assert!(matches!(
            parse_inference_body(body),
            Err(ClassifierError::Malformed(_))
        ));
    }
}
