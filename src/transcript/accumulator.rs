use super::segment::Segment;
use tracing::debug;

/// Whether the stream's finalized list has shrunk below the watermark.
///
/// The stream has no explicit "session ended" event; a restart of the
/// underlying connection shows up only as a drop in its finalized count.
pub fn is_session_reset(finalized_len: usize, committed_count: usize) -> bool {
    finalized_len < committed_count
}

/// Result of reconciling one observation of the finalized list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observation {
    /// Nothing new since the last observation
    Unchanged,
    /// This many segments were appended to the pending queue
    Appended(usize),
    /// The stream restarted; only the watermark moved
    Reset { from: usize, to: usize },
}

/// Tracks finalized segments that have not yet been inserted into the
/// document, and how far into the stream's finalized list we have read.
#[derive(Debug, Clone, Default)]
pub struct SegmentAccumulator {
    /// Segments collected since the last commit or discard
    pending: Vec<Segment>,

    /// Number of stream segments already folded into `pending`
    committed_count: usize,

    /// Partial text appended on the last user-initiated stop
    captured_partial: Option<String>,
}

impl SegmentAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new session with the stream's current finalized count as
    /// baseline. Anything still pending is dropped.
    pub fn begin_session(&mut self, baseline: usize) {
        self.committed_count = baseline;
        self.pending.clear();
    }

    /// Reconcile the stream's finalized list against the watermark
    pub fn observe(&mut self, finalized: &[Segment]) -> Observation {
        let len = finalized.len();

        if is_session_reset(len, self.committed_count) {
            let from = self.committed_count;
            self.committed_count = len;
            debug!("Transcription stream restarted, watermark {} -> {}", from, len);
            return Observation::Reset { from, to: len };
        }

        if len == self.committed_count {
            return Observation::Unchanged;
        }

        let new_segments = &finalized[self.committed_count..];
        self.pending.extend_from_slice(new_segments);
        self.committed_count = len;

        Observation::Appended(new_segments.len())
    }

    /// Capture the live partial when the user stops the session.
    ///
    /// Returns true if a segment was appended.
    pub fn capture_partial(&mut self, partial: &str) -> bool {
        if partial.trim().is_empty() {
            self.captured_partial = None;
            return false;
        }

        self.pending.push(Segment::from_partial(partial));
        self.captured_partial = Some(partial.to_string());
        true
    }

    /// Drop pending segments and the captured-partial marker
    pub fn clear(&mut self) {
        self.pending.clear();
        self.captured_partial = None;
    }

    pub fn pending(&self) -> &[Segment] {
        &self.pending
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn committed_count(&self) -> usize {
        self.committed_count
    }

    pub fn captured_partial(&self) -> Option<&str> {
        self.captured_partial.as_deref()
    }

    /// Text of all pending segments joined with single spaces, skipping
    /// empty strings
    pub fn joined_text(&self) -> String {
        join_texts(self.pending.iter().map(|s| s.text.as_str()))
    }

    /// Preview of what a commit would insert, including the live partial
    /// unless it was already captured into the queue
    pub fn preview(&self, live_partial: Option<&str>) -> String {
        let partial = live_partial
            .filter(|p| !p.is_empty())
            .filter(|p| self.captured_partial.as_deref() != Some(*p));

        join_texts(self.pending.iter().map(|s| s.text.as_str()).chain(partial))
            .trim()
            .to_string()
    }
}

fn join_texts<'a>(texts: impl Iterator<Item = &'a str>) -> String {
    texts
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
