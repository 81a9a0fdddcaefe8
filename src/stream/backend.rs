use super::error::StreamError;
use crate::transcript::Segment;
use serde::{Deserialize, Serialize};

/// Microphone capture constraints requested from the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MicrophoneOptions {
    pub echo_cancellation: bool,
    pub noise_suppression: bool,
}

impl Default for MicrophoneOptions {
    fn default() -> Self {
        Self {
            echo_cancellation: true,
            noise_suppression: true,
        }
    }
}

/// Options for opening a transcription session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectOptions {
    /// Single-use bearer token from the token endpoint
    pub token: String,

    /// Realtime model, e.g. "scribe_v2_realtime"
    pub model_id: String,

    /// Language code, e.g. "en"
    pub language_code: String,

    pub microphone: MicrophoneOptions,

    /// Ask the stream for word timestamps
    pub include_timestamps: bool,
}

/// Live speech-to-text stream
///
/// The stream owns the finalized-segment list and the current partial; the
/// controller only observes them. Implementations:
/// - `ScriptedStream`: in-memory, fed with recorded events (replay, tests)
#[async_trait::async_trait]
pub trait TranscriptionStream: Send {
    fn is_connected(&self) -> bool;

    /// Current unfinalized text
    fn partial_transcript(&self) -> &str;

    /// Segments finalized in the current connection, in order
    fn committed_transcripts(&self) -> &[Segment];

    /// Open a session; resolves once the handshake completes or fails
    async fn connect(&mut self, options: ConnectOptions) -> Result<(), StreamError>;

    /// Close the session; always resolves
    async fn disconnect(&mut self);
}
