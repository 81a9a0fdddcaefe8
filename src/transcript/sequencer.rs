use super::accumulator::SegmentAccumulator;
use crate::document::{next_recording_number, paragraph, DocumentStore};
use anyhow::{Context, Result};
use tracing::info;

/// Text of the block inserted for recording `number`
pub fn recording_block_text(number: u64, text: &str) -> String {
    format!("[Recording {}]: {}", number, text)
}

/// Numbers committed transcript blocks and inserts them into the document
#[derive(Debug, Clone)]
pub struct CommitSequencer {
    /// Number the next commit will use
    next: u64,
}

impl CommitSequencer {
    pub fn new(next: u64) -> Self {
        Self { next }
    }

    /// Continue numbering after the markers already in the document
    pub fn from_document<D: DocumentStore + ?Sized>(document: &D) -> Self {
        Self::new(next_recording_number(document.blocks()))
    }

    /// Number the next commit will use
    pub fn next_number(&self) -> u64 {
        self.next
    }

    /// Insert everything pending as one numbered block.
    ///
    /// Returns the recording number used, or `None` when there was nothing
    /// to commit (empty queue or only blank text). A failed insert leaves the
    /// counter and the queue as they were.
    pub fn commit<D: DocumentStore + ?Sized>(
        &mut self,
        pending: &mut SegmentAccumulator,
        document: &mut D,
    ) -> Result<Option<u64>> {
        if pending.is_empty() {
            return Ok(None);
        }

        let full_text = pending.joined_text();
        if full_text.trim().is_empty() {
            return Ok(None);
        }

        let number = self.next;
        document
            .insert_block(paragraph(&recording_block_text(number, &full_text)))
            .with_context(|| format!("Failed to insert recording {}", number))?;

        self.next = number + 1;
        pending.clear();

        info!(
            "Committed recording {} ({} chars)",
            number,
            full_text.len()
        );

        Ok(Some(number))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{plain_text, Document};
    use crate::transcript::Segment;
    use serde_json::Value;

    struct RejectingStore;

    impl DocumentStore for RejectingStore {
        fn blocks(&self) -> &[Value] {
            &[]
        }

        fn insert_block(&mut self, _block: Value) -> Result<()> {
            anyhow::bail!("read-only")
        }
    }

    fn pending_with(texts: &[&str]) -> SegmentAccumulator {
        let mut acc = SegmentAccumulator::new();
        let segments: Vec<Segment> = texts.iter().map(|t| Segment::new(*t)).collect();
        acc.observe(&segments);
        acc
    }

    #[test]
    fn test_commit_inserts_one_numbered_block() {
        let mut acc = pending_with(&["hello", "world"]);
        let mut doc = Document::default();
        let mut sequencer = CommitSequencer::new(3);

        let number = sequencer.commit(&mut acc, &mut doc).unwrap();

        assert_eq!(number, Some(3));
        assert_eq!(sequencer.next_number(), 4);
        assert!(acc.is_empty());
        assert_eq!(doc.blocks().len(), 1);
        assert_eq!(plain_text(doc.blocks()), "[Recording 3]: hello world");
    }

    #[test]
    fn test_blank_commit_is_noop() {
        let mut acc = pending_with(&["   ", ""]);
        let mut doc = Document::default();
        let mut sequencer = CommitSequencer::new(7);

        assert_eq!(sequencer.commit(&mut acc, &mut doc).unwrap(), None);
        assert_eq!(sequencer.next_number(), 7);
        assert_eq!(acc.pending().len(), 2);
        assert!(doc.blocks().is_empty());
    }

    #[test]
    fn test_empty_queue_is_noop() {
        let mut acc = SegmentAccumulator::new();
        let mut doc = Document::default();
        let mut sequencer = CommitSequencer::new(1);

        assert_eq!(sequencer.commit(&mut acc, &mut doc).unwrap(), None);
        assert_eq!(sequencer.next_number(), 1);
    }

    #[test]
    fn test_failed_insert_keeps_state() {
        let mut acc = pending_with(&["kept"]);
        let mut sequencer = CommitSequencer::new(2);

        assert!(sequencer.commit(&mut acc, &mut RejectingStore).is_err());
        assert_eq!(sequencer.next_number(), 2);
        assert_eq!(acc.pending().len(), 1);
    }

    #[test]
    fn test_from_document_continues_numbering() {
        let doc = Document::new(vec![paragraph("[Recording 6]: earlier")]);
        assert_eq!(CommitSequencer::from_document(&doc).next_number(), 7);
    }
}
