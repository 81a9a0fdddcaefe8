// End-to-end replay of a recorded session
//
// The demo script contains two takes with a connection restart between
// them and a partial captured on stop.

use anyhow::Result;
use scribe_notes::document::{plain_text, Document, DocumentStore};
use scribe_notes::replay::{self, ReplaySummary};
use scribe_notes::store::FileStore;
use scribe_notes::stream::ScriptedStream;
use scribe_notes::token::StaticTokenSource;
use scribe_notes::transcript::{SessionSettings, TranscriptController};
use tempfile::TempDir;

const STANDUP: &str = include_str!("../demos/standup.jsonl");

fn controller(document: Document) -> TranscriptController<ScriptedStream, Document> {
    TranscriptController::new(
        ScriptedStream::new(),
        document,
        Box::new(StaticTokenSource(Some("replay".to_string()))),
        SessionSettings::default(),
    )
}

#[tokio::test]
async fn test_standup_replay() -> Result<()> {
    let steps = replay::parse_script(STANDUP)?;
    let mut controller = controller(Document::default());

    let summary = replay::run(&mut controller, steps).await?;

    assert_eq!(
        summary,
        ReplaySummary {
            recordings: vec![1, 2],
            next_recording: 3,
            pending: 0,
            last_error: None,
        }
    );
    assert_eq!(
        plain_text(controller.document().blocks()),
        "[Recording 1]: Good morning everyone. Let's start with updates.\n\
         [Recording 2]: Backend deploy is done. frontend is blocked on"
    );

    Ok(())
}

#[tokio::test]
async fn test_replay_into_stored_note_continues_numbering() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("files.json");
    let mut store = FileStore::open(&path)?;
    let id = store.create("Standup")?.id;

    for _ in 0..2 {
        let content = store.get(&id).unwrap().content.clone();
        let mut controller = controller(Document::new(content));
        replay::run(&mut controller, replay::parse_script(STANDUP)?).await?;
        let (_, document) = controller.into_parts();
        store.save_content(&id, document.into_blocks())?;
    }

    let store = FileStore::open(&path)?;
    let text = plain_text(&store.get(&id).unwrap().content);
    for n in 1..=4 {
        assert!(text.contains(&format!("[Recording {}]:", n)), "missing {}", n);
    }
    assert!(!text.contains("[Recording 5]:"));

    Ok(())
}

#[tokio::test]
async fn test_discard_and_benign_error() -> Result<()> {
    let script = r#"
        {"step": "toggle"}
        {"step": "committed", "segment": {"text": "scratch that"}}
        {"step": "discard"}
        {"step": "error", "message": "abnormal closure", "code": 1006}
        {"step": "commit"}
    "#;

    let mut controller = controller(Document::default());
    let summary = replay::run(&mut controller, replay::parse_script(script)?).await?;

    assert!(summary.recordings.is_empty());
    assert_eq!(summary.next_recording, 1);
    assert_eq!(summary.last_error, None);
    assert!(controller.document().blocks().is_empty());

    Ok(())
}
