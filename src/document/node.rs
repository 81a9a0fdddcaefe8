use anyhow::Result;
use serde_json::{json, Value};

/// Content of a brand-new note: one empty paragraph
pub fn empty_document() -> Vec<Value> {
    vec![paragraph("")]
}

/// A paragraph block with a single text run
pub fn paragraph(text: &str) -> Value {
    json!({
        "type": "p",
        "children": [{ "text": text }],
    })
}

/// Plain text of a document: each top-level block's child runs
/// concatenated, blocks separated by newlines
pub fn plain_text(blocks: &[Value]) -> String {
    blocks
        .iter()
        .map(|block| {
            block
                .get("children")
                .and_then(Value::as_array)
                .map(|children| {
                    children
                        .iter()
                        .filter_map(|c| c.get("text").and_then(Value::as_str))
                        .collect::<String>()
                })
                .unwrap_or_default()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Whether any top-level block has a non-blank text run
pub fn has_content(blocks: &[Value]) -> bool {
    blocks.iter().any(|block| {
        block
            .get("children")
            .and_then(Value::as_array)
            .is_some_and(|children| {
                children.iter().any(|c| {
                    c.get("text")
                        .and_then(Value::as_str)
                        .is_some_and(|t| !t.trim().is_empty())
                })
            })
    })
}

/// Where committed transcript blocks end up
pub trait DocumentStore {
    /// Current top-level blocks
    fn blocks(&self) -> &[Value];

    /// Insert one block as a single atomic unit at the current edit position
    fn insert_block(&mut self, block: Value) -> Result<()>;
}

/// In-memory document with an optional insertion cursor
#[derive(Debug, Clone, Default)]
pub struct Document {
    blocks: Vec<Value>,

    /// Index the next block is inserted at; `None` appends
    cursor: Option<usize>,
}

impl Document {
    pub fn new(blocks: Vec<Value>) -> Self {
        Self {
            blocks,
            cursor: None,
        }
    }

    /// Move the insertion point; out-of-range positions are clamped
    pub fn set_cursor(&mut self, cursor: Option<usize>) {
        self.cursor = cursor.map(|c| c.min(self.blocks.len()));
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Replace the whole document (e.g. after a format or summarize tool)
    pub fn replace(&mut self, blocks: Vec<Value>) {
        self.blocks = blocks;
        self.cursor = None;
    }

    pub fn into_blocks(self) -> Vec<Value> {
        self.blocks
    }
}

impl DocumentStore for Document {
    fn blocks(&self) -> &[Value] {
        &self.blocks
    }

    fn insert_block(&mut self, block: Value) -> Result<()> {
        match self.cursor {
            Some(at) => {
                self.blocks.insert(at, block);
                // keep typing after the inserted block
                self.cursor = Some(at + 1);
            }
            None => self.blocks.push(block),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_joins_blocks() {
        let blocks = vec![
            json!({ "type": "h1", "children": [{ "text": "Title" }] }),
            json!({ "type": "p", "children": [{ "text": "one " }, { "text": "two", "bold": true }] }),
            json!({ "type": "hr" }),
        ];
        assert_eq!(plain_text(&blocks), "Title\none two\n");
    }

    #[test]
    fn test_has_content() {
        assert!(!has_content(&empty_document()));
        assert!(!has_content(&[paragraph("   ")]));
        assert!(has_content(&[paragraph(""), paragraph("x")]));
    }

    #[test]
    fn test_insert_at_cursor_advances() {
        let mut doc = Document::new(vec![paragraph("a"), paragraph("d")]);
        doc.set_cursor(Some(1));
        doc.insert_block(paragraph("b")).unwrap();
        doc.insert_block(paragraph("c")).unwrap();

        assert_eq!(plain_text(doc.blocks()), "a\nb\nc\nd");
        assert_eq!(doc.cursor(), Some(3));
    }

    #[test]
    fn test_insert_without_cursor_appends() {
        let mut doc = Document::new(empty_document());
        doc.set_cursor(Some(10));
        assert_eq!(doc.cursor(), Some(1));

        doc.set_cursor(None);
        doc.insert_block(paragraph("end")).unwrap();
        assert_eq!(doc.blocks().len(), 2);
        assert_eq!(plain_text(doc.blocks()), "\nend");
    }
}
