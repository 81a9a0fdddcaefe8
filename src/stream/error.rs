use thiserror::Error;

/// WebSocket close code the stream reports on routine drops
pub const ABNORMAL_CLOSURE: u16 = 1006;

/// Why a transcription session could not start or was lost
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StreamError {
    /// Token endpoint failed; carries its `details`/`error` text verbatim
    #[error("{0}")]
    Token(String),

    #[error("No token received")]
    MissingToken,

    #[error("Microphone access is not supported.")]
    MicrophoneUnsupported,

    #[error("Stream closed ({code}): {reason}")]
    Closed { code: u16, reason: String },

    #[error("{0}")]
    Transport(String),
}

impl StreamError {
    /// Errors that still end the session but are not worth reporting
    pub fn is_benign(&self) -> bool {
        matches!(self, StreamError::Closed { code, .. } if *code == ABNORMAL_CLOSURE)
    }
}
