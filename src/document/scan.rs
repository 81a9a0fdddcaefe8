use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static RECORDING_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*\[Recording (\d+)\]:").expect("valid marker regex"));

/// Recording number embedded at the start of a text run, if any
pub fn recording_marker(text: &str) -> Option<u64> {
    RECORDING_MARKER
        .captures(text)
        .and_then(|caps| caps[1].parse().ok())
}

/// Number the next committed recording should use: one past the highest
/// `[Recording N]:` marker anywhere in the tree, or 1 if there is none
pub fn next_recording_number(nodes: &[Value]) -> u64 {
    let mut max = 0;
    for node in nodes {
        scan_node(node, &mut max);
    }
    max + 1
}

fn scan_node(node: &Value, max: &mut u64) {
    match node {
        Value::Array(items) => {
            for item in items {
                scan_node(item, max);
            }
        }
        Value::Object(fields) => {
            if let Some(n) = fields
                .get("text")
                .and_then(Value::as_str)
                .and_then(recording_marker)
            {
                *max = (*max).max(n);
            }
            if let Some(children) = fields.get("children") {
                scan_node(children, max);
            }
        }
        _ => {}
    }
}
