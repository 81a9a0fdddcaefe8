pub mod ai;
pub mod config;
pub mod document;
pub mod http;
pub mod replay;
pub mod store;
pub mod stream;
pub mod token;
pub mod transcript;

pub use ai::{GeminiClient, Models, TextModel, Tool, ToolError, ToolOutcome};
pub use config::Config;
pub use document::{Document, DocumentStore};
pub use http::{create_router, AppState};
pub use store::{FileStore, NoteFile};
pub use stream::{ConnectOptions, ScriptedStream, StreamError, StreamEvent, TranscriptionStream};
pub use token::{HttpTokenSource, StaticTokenSource, TokenSource};
pub use transcript::{
    CommitSequencer, Observation, Segment, SegmentAccumulator, SessionSettings, ToggleOutcome,
    TranscriptController,
};
