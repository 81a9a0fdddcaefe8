use serde::{Deserialize, Serialize};

/// Speaker label attached to segments synthesized from a captured partial
pub const UNKNOWN_SPEAKER: &str = "Unknown";

/// A single word-level token from the transcription stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    /// Token text
    pub text: String,

    /// Diarized speaker, if the stream reported one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaker_id: Option<String>,

    /// Start offset in seconds, when timestamps were requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<f64>,

    /// End offset in seconds, when timestamps were requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<f64>,
}

/// One unit of transcribed speech.
///
/// Segments are produced by the transcription stream and never mutated
/// afterwards; the controller only reads and clones them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Transcribed text (may be empty or whitespace)
    #[serde(default)]
    pub text: String,

    /// Word-level tokens; empty for low-latency partials
    #[serde(default)]
    pub words: Vec<Word>,

    /// Segment-level speaker
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaker_id: Option<String>,
}

impl Segment {
    /// Segment with text only
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            words: Vec::new(),
            speaker_id: None,
        }
    }

    /// Segment synthesized from partial text captured at session stop
    pub fn from_partial(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            words: Vec::new(),
            speaker_id: Some(UNKNOWN_SPEAKER.to_string()),
        }
    }

    /// True when the text has no visible characters
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}
