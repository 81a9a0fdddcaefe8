use super::model::{Models, TextModel};
use super::prompts;
use crate::document::{has_content, plain_text};
use crate::store::{NoteFile, ToolHistoryItem};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

/// AI tools a note can be run through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Tool {
    Format,
    Summarize,
    CreateFlowchart,
    FindActions,
}

#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Document is empty.")]
    EmptyDocument,

    #[error("Flowchart already exists")]
    FlowchartExists,

    #[error("Model returned unusable output")]
    InvalidOutput { raw: String },

    #[error(transparent)]
    Model(#[from] anyhow::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    GoogleTask,
    GoogleCalendar,
    Gmail,
}

/// Something actionable found in a note
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionItem {
    pub action_type: ActionType,
    pub summary: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ActionsResponse {
    pub actions: Vec<ActionItem>,
}

/// What running a tool over a note produced
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutcome {
    /// Note content replaced with this many blocks
    Rewritten { blocks: usize },
    /// Flowchart stored on the note
    Flowchart(Value),
    Actions(Vec<ActionItem>),
}

/// Remove a surrounding ```json ... ``` fence
pub fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let inner = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

fn parse_output(raw: String) -> Result<Value, ToolError> {
    serde_json::from_str(strip_code_fences(&raw)).map_err(|e| {
        warn!("Failed to parse model output: {}", e);
        ToolError::InvalidOutput { raw }
    })
}

/// Summarized document tree
pub async fn summarize(model: &dyn TextModel, text: &str) -> Result<Value, ToolError> {
    parse_output(model.generate(&prompts::summarize(text)).await?)
}

/// Reformatted document tree
pub async fn format(model: &dyn TextModel, text: &str) -> Result<Value, ToolError> {
    parse_output(model.generate(&prompts::format(text)).await?)
}

/// Flowchart graph `{ nodes, edges }`
pub async fn flowchart(model: &dyn TextModel, text: &str) -> Result<Value, ToolError> {
    parse_output(model.generate(&prompts::flowchart(text)).await?)
}

/// Actions found in the text; unparsable output means none
pub async fn extract_actions(
    model: &dyn TextModel,
    text: &str,
) -> Result<Vec<ActionItem>, ToolError> {
    let raw = model
        .generate(&prompts::extract_actions(text, Utc::now()))
        .await?;

    match serde_json::from_str::<ActionsResponse>(strip_code_fences(&raw)) {
        Ok(parsed) => Ok(parsed.actions),
        Err(e) => {
            warn!("Failed to parse extracted actions: {}", e);
            Ok(Vec::new())
        }
    }
}

/// Run `tool` over a note, updating it in place.
///
/// The caller is responsible for persisting the note afterwards.
pub async fn run_tool(
    tool: Tool,
    note: &mut NoteFile,
    models: &Models,
) -> Result<ToolOutcome, ToolError> {
    let text = plain_text(&note.content);
    if text.trim().is_empty() {
        return Err(ToolError::EmptyDocument);
    }

    info!("Running {:?} on note {}", tool, note.id);

    match tool {
        Tool::CreateFlowchart => {
            if note.flowchart.is_some() {
                return Err(ToolError::FlowchartExists);
            }
            let graph = flowchart(models.flowchart.as_ref(), &text).await?;
            if graph.get("nodes").is_none() || graph.get("edges").is_none() {
                return Err(ToolError::InvalidOutput {
                    raw: graph.to_string(),
                });
            }
            note.flowchart = Some(graph.clone());
            Ok(ToolOutcome::Flowchart(graph))
        }
        Tool::FindActions => Ok(ToolOutcome::Actions(
            extract_actions(models.json.as_ref(), &text).await?,
        )),
        Tool::Format | Tool::Summarize => {
            let output = if tool == Tool::Format {
                format(models.json.as_ref(), &text).await?
            } else {
                summarize(models.json.as_ref(), &text).await?
            };

            let blocks = match output {
                Value::Array(blocks) => blocks,
                other => {
                    return Err(ToolError::InvalidOutput {
                        raw: other.to_string(),
                    })
                }
            };

            if !has_content(&blocks) {
                warn!("{:?} produced an empty document", tool);
            }

            let count = blocks.len();
            note.content = blocks;
            note.tool_history.insert(
                0,
                ToolHistoryItem {
                    id: uuid::Uuid::new_v4().to_string(),
                    tool,
                    timestamp: Utc::now(),
                },
            );
            Ok(ToolOutcome::Rewritten { blocks: count })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::paragraph;
    use anyhow::Result;
    use std::sync::Arc;

    struct CannedModel(String);

    #[async_trait::async_trait]
    impl TextModel for CannedModel {
        async fn generate(&self, _prompt: &str) -> Result<String> {
            Ok(self.0.clone())
        }
    }

    fn models(json: &str, flowchart: &str) -> Models {
        Models {
            json: Arc::new(CannedModel(json.to_string())),
            flowchart: Arc::new(CannedModel(flowchart.to_string())),
        }
    }

    fn note_with(text: &str) -> NoteFile {
        let mut note = NoteFile::new("test");
        note.content = vec![paragraph(text)];
        note
    }

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```\n[]\n```"), "[]");
        assert_eq!(strip_code_fences("  {}  "), "{}");
    }

    #[tokio::test]
    async fn test_empty_note_is_rejected() {
        let mut note = NoteFile::new("empty");
        let err = run_tool(Tool::Summarize, &mut note, &models("[]", "{}"))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::EmptyDocument));
    }

    #[tokio::test]
    async fn test_format_replaces_content_and_records_history() {
        let mut note = note_with("raw notes");
        let models = models(r#"[{"type": "h1", "children": [{"text": "Notes"}]}]"#, "{}");

        let outcome = run_tool(Tool::Format, &mut note, &models).await.unwrap();

        assert_eq!(outcome, ToolOutcome::Rewritten { blocks: 1 });
        assert_eq!(plain_text(&note.content), "Notes");
        assert_eq!(note.tool_history.len(), 1);
        assert_eq!(note.tool_history[0].tool, Tool::Format);
    }

    #[tokio::test]
    async fn test_summarize_requires_array() {
        let mut note = note_with("raw notes");
        let err = run_tool(Tool::Summarize, &mut note, &models(r#"{"x": 1}"#, "{}"))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidOutput { .. }));
        assert_eq!(plain_text(&note.content), "raw notes");
    }

    #[tokio::test]
    async fn test_flowchart_stored_once() {
        let mut note = note_with("step one then step two");
        let models = models("[]", "```json\n{\"nodes\": [], \"edges\": []}\n```");

        let outcome = run_tool(Tool::CreateFlowchart, &mut note, &models)
            .await
            .unwrap();
        assert!(matches!(outcome, ToolOutcome::Flowchart(_)));
        assert!(note.flowchart.is_some());

        let err = run_tool(Tool::CreateFlowchart, &mut note, &models)
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::FlowchartExists));
    }

    #[tokio::test]
    async fn test_actions_fall_back_to_empty() {
        let mut note = note_with("email alice about the budget");

        let found = models(
            r#"{"actions": [{"action_type": "gmail", "summary": "Budget", "description": "Send it", "recipient": "alice@example.com"}]}"#,
            "{}",
        );
        match run_tool(Tool::FindActions, &mut note, &found).await.unwrap() {
            ToolOutcome::Actions(actions) => {
                assert_eq!(actions.len(), 1);
                assert_eq!(actions[0].action_type, ActionType::Gmail);
                assert_eq!(actions[0].recipient.as_deref(), Some("alice@example.com"));
            }
            other => panic!("unexpected outcome {:?}", other),
        }

        let garbage = models("not json", "{}");
        assert_eq!(
            run_tool(Tool::FindActions, &mut note, &garbage).await.unwrap(),
            ToolOutcome::Actions(Vec::new())
        );
    }
}
