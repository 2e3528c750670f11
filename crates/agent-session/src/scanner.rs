//! Detection of a tool invocation embedded in free-form model text.
//!
//! The model is expected to emit at most one JSON object per reply
//! shaped `{"tool": "<name>", "params": {...}}`, optionally inside a
//! code fence tagged `json`. A regex locates the candidate (fenced
//! form preferred); the object itself is then cut out by balanced
//! brace scanning, since a lazy regex would stop at the first `}` and
//! truncate any call whose params are an object.

use once_cell::sync::Lazy;
use regex::Regex;

static TOOL_CALL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?s)```json\s*(\{.*?"tool".*?\})\s*```|(\{[^`]*?"tool"\s*:\s*"\w+".*?\})"#,
    )
    .expect("tool-call pattern is valid")
});

/// Extract the JSON slice of the first embedded tool call, if any.
pub fn extract_tool_json(text: &str) -> Option<&str> {
    let captures = TOOL_CALL_RE.captures(text)?;
    let candidate = captures.get(1).or_else(|| captures.get(2))?;
    balanced_object(&text[candidate.start()..])
}

/// Slice of `text` from its leading `{` to the matching `}`, honoring
/// string literals and escapes.
fn balanced_object(text: &str) -> Option<&str> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (idx, ch) in text.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(&text[..idx + 1]);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use webpilot_core_types::ToolCall;

    #[test]
    fn finds_fenced_tool_call() {
        let text = "Let me read the page first.\n```json\n{\"tool\": \"read_page\", \"params\": {}}\n```";
        let json = extract_tool_json(text).unwrap();
        assert!(json.starts_with('{'));
        assert!(json.contains("read_page"));
    }

    #[test]
    fn finds_bare_tool_call() {
        let text = r#"Sure: {"tool": "scroll", "params": {"direction": "down"}}"#;
        let json = extract_tool_json(text).unwrap();
        assert!(json.contains("scroll"));
    }

    #[test]
    fn bare_call_with_object_params_extracts_whole_object() {
        let text = r##"On it. {"tool": "type_text", "params": {"selector": "#q", "text": "rust"}} Done."##;
        let json = extract_tool_json(text).unwrap();
        assert!(json.ends_with('}'));
        let call = ToolCall::from_json_str(json).unwrap();
        assert_eq!(call.name(), "type_text");
    }

    #[test]
    fn braces_inside_string_values_do_not_end_the_object() {
        let text = r#"{"tool": "google_search", "params": {"query": "rust {closures} syntax"}}"#;
        let json = extract_tool_json(text).unwrap();
        let call = ToolCall::from_json_str(json).unwrap();
        assert_eq!(call.name(), "google_search");
    }

    #[test]
    fn prefers_the_fenced_form() {
        let text = "```json\n{\"tool\": \"get_links\", \"params\": {}}\n```";
        let json = extract_tool_json(text).unwrap();
        assert!(!json.contains("```"), "fence delimiters are stripped");
    }

    #[test]
    fn ignores_plain_prose() {
        assert!(extract_tool_json("The capital of France is Paris.").is_none());
        assert!(extract_tool_json("Here is some JSON: {\"answer\": 42}").is_none());
    }

    #[test]
    fn unterminated_object_yields_nothing() {
        let text = r#"{"tool": "scroll", "params": {"direction": "down""#;
        assert!(extract_tool_json(text).is_none());
    }

    #[test]
    fn spans_multiline_params() {
        let text = "```json\n{\n  \"tool\": \"type_text\",\n  \"params\": {\n    \"selector\": \"#q\",\n    \"text\": \"hi\"\n  }\n}\n```";
        let json = extract_tool_json(text).unwrap();
        assert!(ToolCall::from_json_str(json).is_ok());
    }
}
