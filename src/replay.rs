//! Replaying recorded transcription sessions
//!
//! A replay script is JSON lines, one step per line, tagged by `"step"`:
//!
//! ```text
//! {"step": "toggle"}
//! {"step": "partial", "text": "hello wor"}
//! {"step": "committed", "segment": {"text": "hello world"}}
//! {"step": "restart"}
//! {"step": "error", "message": "socket closed", "code": 1006}
//! {"step": "commit"}
//! {"step": "discard"}
//! ```
//!
//! Blank lines and lines starting with `#` are ignored.

use crate::document::DocumentStore;
use crate::stream::{ScriptedStream, StreamEvent};
use crate::transcript::{ToggleOutcome, TranscriptController};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// A user action in a replay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum UserCommand {
    Toggle,
    Commit,
    Discard,
}

/// One line of a replay script
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReplayStep {
    Stream(StreamEvent),
    User(UserCommand),
}

/// What a replay did to the document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReplaySummary {
    /// Recording numbers inserted, in order
    pub recordings: Vec<u64>,
    pub next_recording: u64,
    pub pending: usize,
    pub last_error: Option<String>,
}

/// Parse a JSON-lines replay script
pub fn parse_script(script: &str) -> Result<Vec<ReplayStep>> {
    script
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(n, line)| {
            serde_json::from_str(line).with_context(|| format!("Invalid replay step on line {}", n))
        })
        .collect()
}

/// Feed `steps` through the controller in order
pub async fn run<D: DocumentStore>(
    controller: &mut TranscriptController<ScriptedStream, D>,
    steps: impl IntoIterator<Item = ReplayStep>,
) -> Result<ReplaySummary> {
    let mut summary = ReplaySummary::default();

    for step in steps {
        match step {
            ReplayStep::Stream(event) => {
                let list_changed =
                    matches!(event, StreamEvent::Committed { .. } | StreamEvent::Restart);

                if let Some(err) = controller.stream_mut().apply(event) {
                    controller.on_stream_error(&err);
                }
                if list_changed {
                    let observation = controller.on_committed_changed();
                    debug!("Finalized list changed: {:?}", observation);
                }
            }
            ReplayStep::User(UserCommand::Toggle) => {
                if let ToggleOutcome::Failed(msg) = controller.toggle().await {
                    warn!("Toggle failed during replay: {}", msg);
                }
            }
            ReplayStep::User(UserCommand::Commit) => {
                if let Some(number) = controller.commit()? {
                    summary.recordings.push(number);
                }
            }
            ReplayStep::User(UserCommand::Discard) => controller.discard(),
        }
    }

    summary.next_recording = controller.next_recording_number();
    summary.pending = controller.pending().len();
    summary.last_error = controller.last_error().map(str::to_string);

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::Segment;

    #[test]
    fn test_parse_script() {
        let script = r#"
            # start recording
            {"step": "toggle"}
            {"step": "committed", "segment": {"text": "hi"}}

            {"step": "commit"}
        "#;

        let steps = parse_script(script).unwrap();
        assert_eq!(
            steps,
            vec![
                ReplayStep::User(UserCommand::Toggle),
                ReplayStep::Stream(StreamEvent::Committed {
                    segment: Segment::new("hi")
                }),
                ReplayStep::User(UserCommand::Commit),
            ]
        );
    }

    #[test]
    fn test_parse_error_names_line() {
        let err = parse_script("{\"step\": \"toggle\"}\n{\"step\": \"dance\"}").unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }
}
