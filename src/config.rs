use crate::stream::MicrophoneOptions;
use crate::transcript::SessionSettings;
use anyhow::Result;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub scribe: ScribeConfig,
    pub gemini: GeminiConfig,
    pub elevenlabs: ElevenLabsConfig,
    #[serde(default)]
    pub gumloop: GumloopConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct ScribeConfig {
    pub token_url: String,
    pub model_id: String,
    pub language_code: String,
    pub echo_cancellation: bool,
    pub noise_suppression: bool,
    pub include_timestamps: bool,
}

#[derive(Debug, Deserialize)]
pub struct GeminiConfig {
    pub api_base: String,
    pub model: String,
    pub flowchart_model: String,
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ElevenLabsConfig {
    pub api_base: String,
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GumloopConfig {
    #[serde(default)]
    pub webhook: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StorageConfig {
    pub files_path: String,
}

impl Config {
    /// Load `path` (any format the `config` crate knows, extension optional),
    /// then `SCRIBE_NOTES__SECTION__KEY` environment overrides
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .set_default("service.name", "scribe-notes")?
            .set_default("service.http.bind", "127.0.0.1")?
            .set_default("service.http.port", 3000)?
            .set_default("scribe.token_url", "http://127.0.0.1:3000/api/scribe-token")?
            .set_default("scribe.model_id", "scribe_v2_realtime")?
            .set_default("scribe.language_code", "en")?
            .set_default("scribe.echo_cancellation", true)?
            .set_default("scribe.noise_suppression", true)?
            .set_default("scribe.include_timestamps", true)?
            .set_default("gemini.api_base", "https://generativelanguage.googleapis.com")?
            .set_default("gemini.model", "gemini-1.5-pro")?
            .set_default("gemini.flowchart_model", "gemini-2.5-flash-lite")?
            .set_default("elevenlabs.api_base", "https://api.elevenlabs.io")?
            .set_default("storage.files_path", "~/.scribe-notes/files.json")?
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix("SCRIBE_NOTES").separator("__"))
            .build()?;

        let mut cfg: Config = settings.try_deserialize()?;
        cfg.apply_secret_env(|key| std::env::var(key).ok());
        Ok(cfg)
    }

    /// Fill unset secrets from their conventional environment variables
    fn apply_secret_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        fill(&mut self.gemini.api_key, lookup("GEMINI_API_KEY"));
        fill(&mut self.elevenlabs.api_key, lookup("ELEVENLABS_API_KEY"));
        fill(&mut self.gumloop.webhook, lookup("GUMLOOP_WEBHOOK"));
        fill(&mut self.gumloop.api_key, lookup("GUMLOOP_API_KEY"));
    }

    /// Notes file with `~` and `$VARS` expanded
    pub fn files_path(&self) -> Result<PathBuf> {
        let expanded = shellexpand::full(&self.storage.files_path)?;
        Ok(PathBuf::from(expanded.as_ref()))
    }

    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            model_id: self.scribe.model_id.clone(),
            language_code: self.scribe.language_code.clone(),
            microphone: MicrophoneOptions {
                echo_cancellation: self.scribe.echo_cancellation,
                noise_suppression: self.scribe.noise_suppression,
            },
            include_timestamps: self.scribe.include_timestamps,
        }
    }
}

fn fill(slot: &mut Option<String>, value: Option<String>) {
    if slot.as_deref().map_or(true, str::is_empty) {
        *slot = value.filter(|v| !v.is_empty());
    }
}
