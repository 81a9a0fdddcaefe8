use anyhow::{Context, Result};
use serde_json::json;
use tracing::info;

/// Response relayed back from the webhook
#[derive(Debug, Clone)]
pub struct RelayedResponse {
    pub status: u16,
    pub content_type: String,
    pub body: String,
}

/// Starts a Gumloop flow for a conversation transcript
pub struct GumloopClient {
    client: reqwest::Client,
    webhook: String,
    api_key: String,
}

impl GumloopClient {
    pub fn new(webhook: String, api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            webhook,
            api_key,
        }
    }

    pub async fn start(&self, conversation: &str) -> Result<RelayedResponse> {
        info!("Starting Gumloop flow ({} chars)", conversation.len());

        let response = self
            .client
            .post(&self.webhook)
            .bearer_auth(&self.api_key)
            .json(&json!({ "conversation": conversation }))
            .send()
            .await
            .context("Gumloop webhook request failed")?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/json")
            .to_string();
        let body = response
            .text()
            .await
            .context("Failed to read Gumloop response")?;

        Ok(RelayedResponse {
            status,
            content_type,
            body,
        })
    }
}
