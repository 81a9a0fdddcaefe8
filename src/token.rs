//! Fetching single-use transcription tokens

use crate::stream::StreamError;
use serde::Deserialize;
use tracing::{debug, warn};

/// Body returned by the token endpoint
#[derive(Debug, Default, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub token: Option<String>,

    #[serde(default)]
    pub error: Option<String>,

    #[serde(default)]
    pub details: Option<String>,
}

impl TokenResponse {
    /// Failure message for a non-success response
    pub fn failure_message(&self) -> String {
        self.details
            .clone()
            .or_else(|| self.error.clone())
            .unwrap_or_else(|| "Token fetch failed".to_string())
    }
}

/// Where the controller gets a bearer token before connecting
#[async_trait::async_trait]
pub trait TokenSource: Send + Sync {
    async fn fetch_token(&self) -> Result<String, StreamError>;
}

/// GETs a token from an HTTP endpoint (normally this crate's own
/// `/api/scribe-token`)
pub struct HttpTokenSource {
    client: reqwest::Client,
    url: String,
}

impl HttpTokenSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait::async_trait]
impl TokenSource for HttpTokenSource {
    async fn fetch_token(&self) -> Result<String, StreamError> {
        debug!("Fetching transcription token from {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| StreamError::Token(e.to_string()))?;

        let status = response.status();
        let body = response.bytes().await.unwrap_or_default();
        let parsed: TokenResponse = serde_json::from_slice(&body).unwrap_or_default();

        if !status.is_success() {
            warn!("Token endpoint returned {}", status);
            return Err(StreamError::Token(parsed.failure_message()));
        }

        parsed
            .token
            .filter(|t| !t.is_empty())
            .ok_or(StreamError::MissingToken)
    }
}

/// Always hands out the same token (replays and tests)
pub struct StaticTokenSource(pub Option<String>);

#[async_trait::async_trait]
impl TokenSource for StaticTokenSource {
    async fn fetch_token(&self) -> Result<String, StreamError> {
        self.0.clone().ok_or(StreamError::MissingToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_message_prefers_details() {
        let body: TokenResponse = serde_json::from_str(
            r#"{"error": "Failed to fetch token", "details": "invalid api key"}"#,
        )
        .unwrap();
        assert_eq!(body.failure_message(), "invalid api key");

        let body: TokenResponse =
            serde_json::from_str(r#"{"error": "ELEVENLABS_API_KEY is not set"}"#).unwrap();
        assert_eq!(body.failure_message(), "ELEVENLABS_API_KEY is not set");

        assert_eq!(TokenResponse::default().failure_message(), "Token fetch failed");
    }

    #[tokio::test]
    async fn test_static_source() {
        let source = StaticTokenSource(Some("tok".to_string()));
        assert_eq!(source.fetch_token().await.unwrap(), "tok");

        let source = StaticTokenSource(None);
        assert_eq!(source.fetch_token().await, Err(StreamError::MissingToken));
    }
}
