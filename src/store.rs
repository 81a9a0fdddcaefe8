//! Note persistence
//!
//! All notes live in one JSON file holding a list of
//! `{ id, fileName, content, flowchart, toolHistory }` records.

use crate::ai::Tool;
use crate::document::empty_document;
use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// A tool run that rewrote a note
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolHistoryItem {
    pub id: String,
    pub tool: Tool,
    pub timestamp: DateTime<Utc>,
}

/// A stored note
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteFile {
    pub id: String,

    pub file_name: String,

    /// Document tree
    #[serde(default = "empty_document")]
    pub content: Vec<Value>,

    /// Generated flowchart graph (`{ nodes, edges }`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flowchart: Option<Value>,

    /// Most recent first
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_history: Vec<ToolHistoryItem>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl NoteFile {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            file_name: file_name.into(),
            content: empty_document(),
            flowchart: None,
            tool_history: Vec::new(),
            updated_at: Some(Utc::now()),
        }
    }
}

/// JSON-file backed note list
pub struct FileStore {
    path: PathBuf,
    files: Vec<NoteFile>,
}

impl FileStore {
    /// Load the store at `path`; a missing file is an empty store
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let files = if path.exists() {
            let raw = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("Failed to parse {}", path.display()))?
        } else {
            Vec::new()
        };

        debug!("Opened note store {} ({} notes)", path.display(), files.len());

        Ok(Self { path, files })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn list(&self) -> &[NoteFile] {
        &self.files
    }

    pub fn get(&self, id: &str) -> Option<&NoteFile> {
        self.files.iter().find(|f| f.id == id)
    }

    pub fn has_flowchart(&self, id: &str) -> bool {
        self.get(id).is_some_and(|f| f.flowchart.is_some())
    }

    /// Add a new empty note and persist
    pub fn create(&mut self, file_name: &str) -> Result<NoteFile> {
        let note = NoteFile::new(file_name);
        self.files.push(note.clone());
        self.save()?;

        info!("Created note {} ({})", note.id, note.file_name);
        Ok(note)
    }

    /// Replace a stored note with `note` (matched by id) and persist
    pub fn put(&mut self, mut note: NoteFile) -> Result<()> {
        note.updated_at = Some(Utc::now());
        let slot = self
            .files
            .iter_mut()
            .find(|f| f.id == note.id)
            .ok_or_else(|| anyhow!("Note {} not found", note.id))?;
        *slot = note;
        self.save()
    }

    pub fn save_content(&mut self, id: &str, content: Vec<Value>) -> Result<()> {
        let mut note = self.require(id)?.clone();
        note.content = content;
        self.put(note)
    }

    pub fn save_flowchart(&mut self, id: &str, flowchart: Value) -> Result<()> {
        let mut note = self.require(id)?.clone();
        note.flowchart = Some(flowchart);
        self.put(note)
    }

    fn require(&self, id: &str) -> Result<&NoteFile> {
        self.get(id).ok_or_else(|| anyhow!("Note {} not found", id))
    }

    /// Write the whole list via a temp file and rename
    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create directory {}", parent.display())
                })?;
            }
        }

        let json = serde_json::to_vec_pretty(&self.files)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).with_context(|| format!("Failed to write {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;

        Ok(())
    }
}
