use crate::ai::{ElevenLabsTokenIssuer, GeminiClient, GumloopClient, Models, TokenIssuer};
use crate::config::Config;
use std::sync::Arc;
use tracing::warn;

/// Shared application state for HTTP handlers
///
/// Each collaborator is optional: a missing API key leaves it unset and the
/// matching endpoint answers with a configuration error instead.
#[derive(Clone, Default)]
pub struct AppState {
    pub models: Option<Models>,
    pub tokens: Option<Arc<dyn TokenIssuer>>,
    pub gumloop: Option<Arc<GumloopClient>>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the real clients from configuration
    pub fn from_config(cfg: &Config) -> Self {
        let models = cfg.gemini.api_key.clone().map(|key| Models {
            json: Arc::new(
                GeminiClient::new(&cfg.gemini.api_base, key.clone(), cfg.gemini.model.clone())
                    .with_json_output(),
            ),
            flowchart: Arc::new(GeminiClient::new(
                &cfg.gemini.api_base,
                key,
                cfg.gemini.flowchart_model.clone(),
            )),
        });
        if models.is_none() {
            warn!("GEMINI_API_KEY is not set; AI tools are disabled");
        }

        let tokens = cfg.elevenlabs.api_key.clone().map(|key| {
            Arc::new(ElevenLabsTokenIssuer::new(&cfg.elevenlabs.api_base, key))
                as Arc<dyn TokenIssuer>
        });
        if tokens.is_none() {
            warn!("ELEVENLABS_API_KEY is not set; transcription tokens are disabled");
        }

        let gumloop = match (&cfg.gumloop.webhook, &cfg.gumloop.api_key) {
            (Some(webhook), Some(key)) => {
                Some(Arc::new(GumloopClient::new(webhook.clone(), key.clone())))
            }
            _ => None,
        };

        Self {
            models,
            tokens,
            gumloop,
        }
    }

    pub fn with_models(mut self, models: Models) -> Self {
        self.models = Some(models);
        self
    }

    pub fn with_tokens(mut self, tokens: Arc<dyn TokenIssuer>) -> Self {
        self.tokens = Some(tokens);
        self
    }

    pub fn with_gumloop(mut self, gumloop: Arc<GumloopClient>) -> Self {
        self.gumloop = Some(gumloop);
        self
    }
}
