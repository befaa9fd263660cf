use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_SENTIMENT_MODEL: &str = "distilbert-base-uncased-finetuned-sst-2-english";
const DEFAULT_CLASSIFIER_TIMEOUT_MS: u64 = 10_000;

/// Application configuration loaded from environment variables.
/// Nothing is required; without `SENTIMENT_API_URL` every answer gets the fallback score.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub sentiment_api_url: Option<String>,
    pub sentiment_api_token: Option<String>,
    pub sentiment_model: String,
    pub classifier_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: parse_port(optional_env("PORT"))?,
            rust_log: optional_env("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            sentiment_api_url: optional_env("SENTIMENT_API_URL"),
            sentiment_api_token: optional_env("SENTIMENT_API_TOKEN"),
            sentiment_model: optional_env("SENTIMENT_MODEL")
                .unwrap_or_else(|| DEFAULT_SENTIMENT_MODEL.to_string()),
            classifier_timeout: parse_timeout_ms(optional_env("CLASSIFIER_TIMEOUT_MS"))?,
        })
    }

    /// Local settings with no classifier endpoint.
    #[cfg(test)]
    pub fn local() -> Self {
        Config {
            port: DEFAULT_PORT,
            rust_log: "info".to_string(),
            sentiment_api_url: None,
            sentiment_api_token: None,
            sentiment_model: DEFAULT_SENTIMENT_MODEL.to_string(),
            classifier_timeout: Duration::from_millis(DEFAULT_CLASSIFIER_TIMEOUT_MS),
        }
    }
}

/// Reads a variable, treating blank values as unset.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_port(raw: Option<String>) -> Result<u16> {
    match raw {
        Some(v) => v
            .parse::<u16>()
            .context("PORT must be a valid port number"),
        None => Ok(DEFAULT_PORT),
    }
}

fn parse_timeout_ms(raw: Option<String>) -> Result<Duration> {
    let ms = match raw {
        Some(v) => v
            .parse::<u64>()
            .context("CLASSIFIER_TIMEOUT_MS must be a whole number of milliseconds")?,
        None => DEFAULT_CLASSIFIER_TIMEOUT_MS,
    };
    Ok(Duration::from_millis(ms))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_defaults_and_parses() {
        assert_eq!(parse_port(None).unwrap(), 8080);
        assert_eq!(parse_port(Some("3000".to_string())).unwrap(), 3000);
        assert!(parse_port(Some("99999".to_string())).is_err());
    }

    #[test]
    fn test_timeout_defaults_and_parses() {
        assert_eq!(parse_timeout_ms(None).unwrap(), Duration::from_secs(10));
        assert_eq!(
            parse_timeout_ms(Some("250".to_string())).unwrap(),
            Duration::from_millis(250)
        );
        let err = parse_timeout_ms(Some("soon".to_string())).unwrap_err();
        assert!(err.to_string().contains("CLASSIFIER_TIMEOUT_MS"));
    }
}
