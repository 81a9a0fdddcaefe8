//! HTTP API consumed by the editor front end
//!
//! - GET /health - Health check
//! - GET /api/scribe-token - Single-use realtime transcription token
//! - POST /api/ai/summarize - Summarize a document
//! - POST /api/ai/format - Reformat a document
//! - POST /api/ai/flowchart - Generate a flowchart graph
//! - POST /api/ai/extract-actions - Find tasks, events and emails
//! - POST /api/gumloop - Hand a conversation to a Gumloop flow

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
