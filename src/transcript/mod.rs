//! Live transcript reconciliation
//!
//! This module turns a stream of finalized speech segments into numbered
//! document blocks:
//! - `SegmentAccumulator`: pending segments and the stream watermark
//! - `CommitSequencer`: `[Recording N]:` numbering and block insertion
//! - `is_session_reset`: stream restart detection
//! - `TranscriptController`: wires the above to a stream and a document

mod accumulator;
mod controller;
mod segment;
mod sequencer;

pub use accumulator::{is_session_reset, Observation, SegmentAccumulator};
pub use controller::{SessionSettings, ToggleOutcome, TranscriptController};
pub use segment::{Segment, Word, UNKNOWN_SPEAKER};
pub use sequencer::{recording_block_text, CommitSequencer};
