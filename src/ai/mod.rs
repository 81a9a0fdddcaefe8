//! AI text tools and the third-party services behind them
//!
//! - Gemini for summarize / format / flowchart / action extraction
//! - ElevenLabs for single-use transcription tokens
//! - Gumloop for handing conversations to an external flow

mod elevenlabs;
mod gumloop;
mod model;
pub mod prompts;
mod tools;

pub use elevenlabs::{ElevenLabsTokenIssuer, TokenIssuer};
pub use gumloop::{GumloopClient, RelayedResponse};
pub use model::{GeminiClient, Models, TextModel};
pub use tools::{
    extract_actions, flowchart, format, run_tool, strip_code_fences, summarize, ActionItem,
    ActionType, ActionsResponse, Tool, ToolError, ToolOutcome,
};
