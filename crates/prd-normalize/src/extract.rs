//! Locating a JSON object inside noisy model output

use crate::error::UnparseableCause;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use std::borrow::Cow;

/// Upper bound on candidate objects tried after the strict parse fails
const MAX_CANDIDATES: usize = 16;

#[allow(clippy::expect_used)]
static THINK_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<think>.*?(?:</think>|\z)").expect("valid think pattern"));

/// Remove `<think>` reasoning blocks; an unterminated block runs to the end
pub(crate) fn strip_thinking(raw: &str) -> Cow<'_, str> {
    THINK_BLOCK.replace_all(raw, "")
}

/// Parse `text` into a JSON object, recovering it from surrounding prose
pub(crate) fn parse_object(text: &str) -> Result<Map<String, Value>, UnparseableCause> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(UnparseableCause::EmptyInput);
    }

    let mut first_error = match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::Object(map)) => return Ok(map),
        Ok(_) => Some(UnparseableCause::NotAnObject),
        Err(_) => None,
    };

    let mut cursor = 0;
    for _ in 0..MAX_CANDIDATES {
        let Some(offset) = text[cursor..].find('{') else {
            break;
        };
        let start = cursor + offset;
        let (candidate, balanced) = match matching_brace(text, start) {
            Some(end) => (&text[start..=end], true),
            None => match text.rfind('}') {
                Some(end) if end > start => (&text[start..=end], false),
                _ => (&text[start..], false),
            },
        };

        match serde_json::from_str::<Value>(candidate) {
            Ok(Value::Object(map)) => {
                tracing::debug!(start, len = candidate.len(), "recovered JSON object from prose");
                return Ok(map);
            }
            Ok(_) => {
                first_error.get_or_insert(UnparseableCause::NotAnObject);
            }
            Err(err) => {
                first_error.get_or_insert(UnparseableCause::InvalidJson(err.to_string()));
            }
        }

        if !balanced {
            break;
        }
        cursor = start + candidate.len();
    }

    Err(first_error.unwrap_or(UnparseableCause::NoJsonObject))
}

/// Byte offset of the `}` closing the `{` at `start`, skipping string literals
fn matching_brace(text: &str, start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, byte) in text.as_bytes()[start..].iter().enumerate() {
        if in_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match byte {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(start + offset);
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

    #[test]
    fn strict_object_parses() {
        let map = parse_object(r#"{"Executive Summary": "X"}"#).unwrap();
        assert_eq!(map["Executive Summary"], "X");
    }

    #[test]
    fn think_block_compiles() {
        Lazy::force(&THINK_BLOCK);
    }

    #[test]
    fn object_recovered_from_prose() {
        let map = parse_object(r#"Here is your PRD: {"Executive Summary": "X"} Thanks!"#).unwrap();
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn braces_inside_strings_are_ignored() {
        let text = r#"Sure! {"Architecture": "use {curly} \"quoted\" braces}"} done"#;
        let map = parse_object(text).unwrap();
        assert_eq!(map["Architecture"], r#"use {curly} "quoted" braces}"#);
    }

    #[test]
    fn later_candidate_after_stray_brace() {
        let text = r#"Use {placeholders} carefully. {"Target Users": ["Ops"]}"#;
        let map = parse_object(text).unwrap();
        assert!(map.contains_key("Target Users"));
    }

    #[test]
    fn trailing_stray_brace_is_ignored() {
        let text = "{\"Problem Statement\": \"Waste\"} trailing {";
        let map = parse_object(text).unwrap();
        assert_eq!(map["Problem Statement"], "Waste");
    }

    #[test]
    fn unbalanced_candidate_reports_invalid_json() {
        let text = "Note: { starts here {\"Problem Statement\": \"Waste\"}";
        assert!(matches!(
            parse_object(text),
            Err(UnparseableCause::InvalidJson(_))
        ));
    }

    #[test]
    fn empty_and_whitespace_input() {
        assert_eq!(parse_object(""), Err(UnparseableCause::EmptyInput));
        assert_eq!(parse_object("  \n\t"), Err(UnparseableCause::EmptyInput));
    }

    #[test]
    fn prose_without_object() {
        assert_eq!(
            parse_object("I could not produce a document."),
            Err(UnparseableCause::NoJsonObject)
        );
    }

    #[test]
    fn top_level_array_is_not_an_object() {
        assert_eq!(parse_object(r#"["a", "b"]"#), Err(UnparseableCause::NotAnObject));
    }

    #[test]
    fn truncated_object_is_invalid_json() {
        let result = parse_object(r#"{"Executive Summary": "cut off"#);
        assert!(matches!(result, Err(UnparseableCause::InvalidJson(_))));
    }

    #[test]
    fn thinking_blocks_removed() {
        let raw = "<think>maybe {not this}</think>{\"Product Goals\": \"Ship\"}";
        assert_eq!(strip_thinking(raw), "{\"Product Goals\": \"Ship\"}");
        assert_eq!(strip_thinking("{\"a\": 1}<THINK>unfinished"), "{\"a\": 1}");
    }

    #[test]
    fn matching_brace_handles_nesting() {
        let text = r#"x{"a": {"b": "}"}}y"#;
        assert_eq!(matching_brace(text, 1), Some(text.len() - 2));
    }
}
