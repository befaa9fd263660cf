mod classifier;
mod config;
mod errors;
mod questions;
mod routes;
mod scoring;
mod sessions;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::classifier::inference::InferenceClassifier;
use crate::classifier::{warm_up_until_ready, ClassifierHandle};
use crate::config::Config;
use crate::questions::bank::QuestionBank;
use crate::routes::build_router;
use crate::sessions::store::InMemorySessionStore;
use crate::state::AppState;

/// First pause before retrying a failed sentiment warm-up.
const WARM_UP_RETRY_DELAY: Duration = Duration::from_secs(2);

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting HireIQ API v{}", env!("CARGO_PKG_VERSION"));

    let questions = QuestionBank::load_bundled()?;
    info!("Question bank loaded: {} roles", questions.roles().len());

    // The handle stays unready until warm-up succeeds; scoring falls back meanwhile.
    let classifier = ClassifierHandle::new();
    match &config.sentiment_api_url {
        Some(url) => {
            let backend =
                InferenceClassifier::new(url.clone(), config.sentiment_api_token.clone())?;
            info!("Warming up sentiment model {}", config.sentiment_model);
            tokio::spawn(warm_up_until_ready(
                classifier.clone(),
                Arc::new(backend),
                WARM_UP_RETRY_DELAY,
            ));
        }
        None => warn!("SENTIMENT_API_URL not set; every answer will receive fallback scores"),
    }

    let state = AppState::new(
        config.clone(),
        questions,
        classifier,
        Arc::new(InMemorySessionStore::new()),
    );

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
