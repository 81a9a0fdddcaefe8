//! Prompt builders for the AI tools

use chrono::{DateTime, Utc};

const BLOCK_SHAPE: &str = r#"Respond with a JSON array of blocks. Each block is
{ "type": "p" | "h1" | "h2" | "h3" | "blockquote", "children": [{ "text": string, "bold"?: true, "italic"?: true, "underline"?: true }] }."#;

pub fn summarize(text: &str) -> String {
    format!(
        "Summarize the following notes into a short, well-structured document.\n\
         {BLOCK_SHAPE}\n\nNotes:\n{text}"
    )
}

pub fn format(text: &str) -> String {
    format!(
        "Reformat the following notes with headings, quotes and emphasis where they help. \
         Do not add or remove content.\n{BLOCK_SHAPE}\n\nNotes:\n{text}"
    )
}

pub fn flowchart(text: &str) -> String {
    format!(
        "Turn the following notes into a flowchart. Respond with JSON only:\n\
         {{ \"nodes\": [{{ \"id\": string, \"data\": {{ \"label\": string }}, \"position\": {{ \"x\": number, \"y\": number }} }}],\n\
           \"edges\": [{{ \"id\": string, \"source\": string, \"target\": string }}] }}\n\n\
         Notes:\n{text}"
    )
}

pub fn extract_actions(text: &str, now: DateTime<Utc>) -> String {
    format!(
        "Analyze the following text and identify any actionable items such as tasks, \
         calendar events, or emails to be sent.\n\
         Return a JSON object with a single key \"actions\" containing an array of objects, each with:\n\
         - action_type: \"google_task\" | \"google_calendar\" | \"gmail\"\n\
         - summary: short title or subject\n\
         - description: details or body\n\
         - recipient: email address (only for \"gmail\")\n\
         - start_time: ISO date string or natural language time (only for \"google_calendar\")\n\
         If no actions are found, return {{ \"actions\": [] }}.\n\n\
         The current date and time is {}. All dates must be relative to it.\n\n\
         Text to analyze:\n{text}",
        now.to_rfc3339()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_prompts_embed_text() {
        assert!(summarize("alpha").ends_with("alpha"));
        assert!(format("beta").ends_with("beta"));
        assert!(flowchart("gamma").ends_with("gamma"));
    }

    #[test]
    fn test_extract_actions_includes_date() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap();
        let prompt = extract_actions("email bob", now);
        assert!(prompt.contains("2026-03-01T09:30:00+00:00"));
        assert!(prompt.ends_with("email bob"));
    }
}
