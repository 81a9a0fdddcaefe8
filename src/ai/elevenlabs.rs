use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use tracing::debug;

/// Hands out single-use realtime transcription tokens
#[async_trait::async_trait]
pub trait TokenIssuer: Send + Sync {
    async fn issue(&self) -> Result<String>;
}

#[derive(Debug, Deserialize)]
struct SingleUseToken {
    token: Option<String>,
}

/// ElevenLabs single-use token API
pub struct ElevenLabsTokenIssuer {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
}

impl ElevenLabsTokenIssuer {
    pub fn new(api_base: &str, api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: api_base.trim_end_matches('/').to_string(),
            api_key,
        }
    }
}

#[async_trait::async_trait]
impl TokenIssuer for ElevenLabsTokenIssuer {
    async fn issue(&self) -> Result<String> {
        let url = format!("{}/v1/single-use-token/realtime_scribe", self.api_base);
        debug!("Requesting single-use token from {}", url);

        let response = self
            .client
            .post(&url)
            .header("xi-api-key", &self.api_key)
            .send()
            .await
            .context("Token request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("Token request returned {}: {}", status, body));
        }

        let body: SingleUseToken = response
            .json()
            .await
            .context("Failed to decode token response")?;

        body.token.ok_or_else(|| anyhow!("Unexpected token"))
    }
}
