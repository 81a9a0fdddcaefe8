//! Rich-text document tree
//!
//! Documents are kept as loose JSON node trees (`{ type, children }` blocks
//! with `{ text }` leaves) since format and summarize tools hand back whole
//! new trees produced by a model.

mod node;
mod scan;

pub use node::{empty_document, has_content, paragraph, plain_text, Document, DocumentStore};
pub use scan::{next_recording_number, recording_marker};
