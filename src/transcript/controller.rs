use super::accumulator::{Observation, SegmentAccumulator};
use super::segment::Segment;
use super::sequencer::CommitSequencer;
use crate::document::DocumentStore;
use crate::stream::{ConnectOptions, MicrophoneOptions, StreamError, TranscriptionStream};
use crate::token::TokenSource;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

/// Per-session options passed to the stream on connect
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSettings {
    pub model_id: String,
    pub language_code: String,
    pub microphone: MicrophoneOptions,
    pub include_timestamps: bool,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            model_id: "scribe_v2_realtime".to_string(),
            language_code: "en".to_string(),
            microphone: MicrophoneOptions::default(),
            include_timestamps: true,
        }
    }
}

/// What a toggle did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// A new session is live
    Connected,
    /// The session was stopped; `captured` is true if the live partial was
    /// moved into the pending queue first
    Stopped { captured: bool },
    /// Connecting failed; nothing else changed
    Failed(String),
}

/// Reconciles a live transcription stream with a document
///
/// Stream updates come in through `on_committed_changed` and
/// `on_stream_error`; user actions through `toggle`, `commit` and `discard`.
pub struct TranscriptController<S, D> {
    stream: S,
    document: D,
    tokens: Box<dyn TokenSource>,
    settings: SessionSettings,
    accumulator: SegmentAccumulator,
    sequencer: CommitSequencer,

    /// Last failure shown to the user
    last_error: Option<String>,
}

impl<S: TranscriptionStream, D: DocumentStore> TranscriptController<S, D> {
    pub fn new(
        stream: S,
        document: D,
        tokens: Box<dyn TokenSource>,
        settings: SessionSettings,
    ) -> Self {
        let sequencer = CommitSequencer::from_document(&document);
        info!(
            "Transcript controller ready, next recording is {}",
            sequencer.next_number()
        );

        Self {
            stream,
            document,
            tokens,
            settings,
            accumulator: SegmentAccumulator::new(),
            sequencer,
            last_error: None,
        }
    }

    /// Start a session, or stop the running one.
    ///
    /// Stopping captures a non-blank partial into the pending queue before
    /// the stream is disconnected.
    pub async fn toggle(&mut self) -> ToggleOutcome {
        if self.stream.is_connected() {
            let captured = self
                .accumulator
                .capture_partial(self.stream.partial_transcript());
            self.stream.disconnect().await;

            info!(
                "Transcription stopped ({} segments pending)",
                self.accumulator.pending().len()
            );
            return ToggleOutcome::Stopped { captured };
        }

        self.last_error = None;

        match self.open_session().await {
            Ok(()) => {
                let baseline = self.stream.committed_transcripts().len();
                self.accumulator.begin_session(baseline);
                info!("Transcription started (baseline {})", baseline);
                ToggleOutcome::Connected
            }
            Err(e) => {
                error!("Connection failed: {}", e);
                let message = e.to_string();
                self.last_error = Some(message.clone());
                ToggleOutcome::Failed(message)
            }
        }
    }

    async fn open_session(&mut self) -> Result<(), StreamError> {
        let token = self.tokens.fetch_token().await?;

        let options = ConnectOptions {
            token,
            model_id: self.settings.model_id.clone(),
            language_code: self.settings.language_code.clone(),
            microphone: self.settings.microphone,
            include_timestamps: self.settings.include_timestamps,
        };

        self.stream.connect(options).await
    }

    /// The stream's finalized list changed
    pub fn on_committed_changed(&mut self) -> Observation {
        self.accumulator.observe(self.stream.committed_transcripts())
    }

    /// The stream reported an error and dropped the session
    pub fn on_stream_error(&mut self, err: &StreamError) {
        if err.is_benign() {
            return;
        }
        error!("Transcription stream error: {}", err);
        self.last_error = Some(err.to_string());
    }

    /// Insert everything pending as one numbered recording block
    pub fn commit(&mut self) -> Result<Option<u64>> {
        self.sequencer
            .commit(&mut self.accumulator, &mut self.document)
    }

    /// Drop everything pending without touching the document
    pub fn discard(&mut self) {
        self.accumulator.clear();
    }

    pub fn pending(&self) -> &[Segment] {
        self.accumulator.pending()
    }

    /// Pending text plus the live partial, as shown above the editor
    pub fn pending_preview(&self) -> String {
        let live = self
            .stream
            .is_connected()
            .then(|| self.stream.partial_transcript());
        self.accumulator.preview(live)
    }

    /// Whether the transcript controls should be shown at all
    pub fn is_active(&self) -> bool {
        self.stream.is_connected() || !self.accumulator.is_empty()
    }

    pub fn committed_count(&self) -> usize {
        self.accumulator.committed_count()
    }

    pub fn next_recording_number(&self) -> u64 {
        self.sequencer.next_number()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn stream(&self) -> &S {
        &self.stream
    }

    pub fn stream_mut(&mut self) -> &mut S {
        &mut self.stream
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    pub fn into_parts(self) -> (S, D) {
        (self.stream, self.document)
    }
}
