//! Live transcription stream boundary
//!
//! - `TranscriptionStream`: what the controller observes and drives
//! - `ScriptedStream`: in-memory stream fed with recorded `StreamEvent`s
//! - `StreamError`: connection and stream failures

mod backend;
mod error;
mod scripted;

pub use backend::{ConnectOptions, MicrophoneOptions, TranscriptionStream};
pub use error::{StreamError, ABNORMAL_CLOSURE};
pub use scripted::{ScriptedStream, StreamEvent};
