use super::backend::{ConnectOptions, TranscriptionStream};
use super::error::StreamError;
use crate::transcript::Segment;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Something the transcription stream reports
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum StreamEvent {
    /// The in-flight partial changed
    Partial { text: String },

    /// A segment was finalized
    Committed { segment: Segment },

    /// The underlying connection restarted and dropped its finalized list
    Restart,

    /// The stream failed and disconnected
    Error {
        message: String,
        #[serde(default)]
        code: Option<u16>,
    },
}

/// In-memory transcription stream driven by `StreamEvent`s
#[derive(Debug, Clone)]
pub struct ScriptedStream {
    connected: bool,
    partial: String,
    committed: Vec<Segment>,

    /// Whether the platform exposes a microphone
    microphone_available: bool,

    /// Error returned by the next `connect` call
    fail_next_connect: Option<StreamError>,

    /// Options passed to the last successful `connect`
    last_options: Option<ConnectOptions>,

    disconnect_count: usize,
}

impl Default for ScriptedStream {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedStream {
    pub fn new() -> Self {
        Self {
            connected: false,
            partial: String::new(),
            committed: Vec::new(),
            microphone_available: true,
            fail_next_connect: None,
            last_options: None,
            disconnect_count: 0,
        }
    }

    /// Stream on a platform without microphone access
    pub fn without_microphone() -> Self {
        Self {
            microphone_available: false,
            ..Self::new()
        }
    }

    /// Make the next `connect` fail with `err`
    pub fn fail_next_connect(&mut self, err: StreamError) {
        self.fail_next_connect = Some(err);
    }

    pub fn last_options(&self) -> Option<&ConnectOptions> {
        self.last_options.as_ref()
    }

    pub fn disconnect_count(&self) -> usize {
        self.disconnect_count
    }

    /// Apply one event. Returns the error if the event ended the session.
    pub fn apply(&mut self, event: StreamEvent) -> Option<StreamError> {
        match event {
            StreamEvent::Partial { text } => {
                self.partial = text;
                None
            }
            StreamEvent::Committed { segment } => {
                self.committed.push(segment);
                self.partial.clear();
                None
            }
            StreamEvent::Restart => {
                debug!(
                    "Scripted stream restart, dropping {} finalized segments",
                    self.committed.len()
                );
                self.committed.clear();
                self.partial.clear();
                None
            }
            StreamEvent::Error { message, code } => {
                self.connected = false;
                Some(match code {
                    Some(code) => StreamError::Closed {
                        code,
                        reason: message,
                    },
                    None => StreamError::Transport(message),
                })
            }
        }
    }
}

#[async_trait::async_trait]
impl TranscriptionStream for ScriptedStream {
    fn is_connected(&self) -> bool {
        self.connected
    }

    fn partial_transcript(&self) -> &str {
        &self.partial
    }

    fn committed_transcripts(&self) -> &[Segment] {
        &self.committed
    }

    async fn connect(&mut self, options: ConnectOptions) -> Result<(), StreamError> {
        if let Some(err) = self.fail_next_connect.take() {
            return Err(err);
        }
        if !self.microphone_available {
            return Err(StreamError::MicrophoneUnsupported);
        }

        info!(
            "Scripted stream connected (model={}, language={})",
            options.model_id, options.language_code
        );
        self.last_options = Some(options);
        self.connected = true;
        Ok(())
    }

    async fn disconnect(&mut self) {
        self.connected = false;
        self.partial.clear();
        self.disconnect_count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_json_shape() {
        let event: StreamEvent =
            serde_json::from_str(r#"{"step": "committed", "segment": {"text": "hi"}}"#).unwrap();
        assert_eq!(
            event,
            StreamEvent::Committed {
                segment: Segment::new("hi")
            }
        );

        let event: StreamEvent =
            serde_json::from_str(r#"{"step": "error", "message": "gone"}"#).unwrap();
        assert_eq!(
            event,
            StreamEvent::Error {
                message: "gone".to_string(),
                code: None
            }
        );
    }

    #[test]
    fn test_commit_clears_partial_and_restart_clears_list() {
        let mut stream = ScriptedStream::new();
        stream.apply(StreamEvent::Partial {
            text: "hel".to_string(),
        });
        stream.apply(StreamEvent::Committed {
            segment: Segment::new("hello"),
        });
        assert_eq!(stream.partial_transcript(), "");
        assert_eq!(stream.committed_transcripts().len(), 1);

        stream.apply(StreamEvent::Restart);
        assert!(stream.committed_transcripts().is_empty());
    }

    #[test]
    fn test_error_event_disconnects() {
        let mut stream = ScriptedStream::new();
        stream.connected = true;

        let err = stream.apply(StreamEvent::Error {
            message: "dropped".to_string(),
            code: Some(1006),
        });

        assert!(!stream.is_connected());
        assert!(err.is_some_and(|e| e.is_benign()));
    }
}
