//! Structural coercion of a parsed JSON object into a [`Document`]
//!
//! Coercion is total: every JSON value has a nearest-fit representation.

use once_cell::sync::Lazy;
use prd_schema::{Diagram, DiagramKind, Document, ImageSuggestion, SectionContent, SectionName};
use regex::Regex;
use serde_json::{Map, Value};

/// Nesting depth past which values are kept as compact JSON text
pub(crate) const MAX_DEPTH: usize = 8;

const CONTENT_KEY: &str = "content";
const DIAGRAMS_KEY: &str = "diagrams";
const SEARCH_TERMS_KEY: &str = "search_terms";
const IMAGE_SUGGESTIONS_KEY: &str = "image_suggestions";

#[allow(clippy::expect_used)]
static CODE_FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)```[^\n]*\n?(.*?)(?:```|\z)").expect("valid code fence pattern")
});

#[derive(Debug, Default)]
struct SectionParts {
    content: SectionContent,
    diagrams: Vec<Diagram>,
    search_terms: Vec<String>,
}

pub(crate) fn coerce_document(root: Map<String, Value>) -> Document {
    let exact: Vec<SectionName> = SectionName::ALL
        .into_iter()
        .filter(|name| root.contains_key(name.display_name()))
        .collect();

    let mut document = Document::new();
    let mut filled = [false; SectionName::ALL.len()];
    let mut hoisted_diagrams = Vec::new();
    let mut hoisted_terms = Vec::new();

    for (key, value) in root {
        if let Some(name) = SectionName::from_key(&key) {
            let shadowed = exact.contains(&name) && key != name.display_name();
            if shadowed || filled[name.index()] {
                tracing::debug!(key = %key, section = %name, "duplicate section key kept as metadata");
                document.metadata.insert(key, value);
                continue;
            }
            filled[name.index()] = true;
            let parts = coerce_section(&value, 0);
            if let Some(section) = document.section_mut(name) {
                section.content = parts.content;
                section.diagrams = parts.diagrams;
                section.search_terms = parts.search_terms;
            }
            continue;
        }

        match key.as_str() {
            IMAGE_SUGGESTIONS_KEY => document.image_suggestions = coerce_suggestions(&value),
            DIAGRAMS_KEY => hoisted_diagrams.extend(coerce_diagrams(&value)),
            SEARCH_TERMS_KEY => hoisted_terms.extend(coerce_terms(&value)),
            _ => {
                document.metadata.insert(key, value);
            }
        }
    }

    if !hoisted_diagrams.is_empty() {
        if let Some(section) = document.section_mut(SectionName::Architecture) {
            section.diagrams.extend(hoisted_diagrams);
        }
    }
    if !hoisted_terms.is_empty() {
        if let Some(section) = document.section_mut(SectionName::References) {
            section.search_terms.extend(hoisted_terms);
        }
    }

    document
}

fn coerce_section(value: &Value, depth: usize) -> SectionParts {
    match value {
        Value::Object(map) if depth < MAX_DEPTH => coerce_object_section(map, depth),
        other => SectionParts {
            content: coerce_content(other, depth),
            ..SectionParts::default()
        },
    }
}

fn coerce_object_section(map: &Map<String, Value>, depth: usize) -> SectionParts {
    let mut parts = SectionParts::default();
    let mut extra = Vec::new();
    let mut has_content = false;

    for (key, value) in map {
        match key.as_str() {
            CONTENT_KEY if !has_content => {
                has_content = true;
                let inner = coerce_section(value, depth + 1);
                parts.content = inner.content;
                parts.diagrams.extend(inner.diagrams);
                parts.search_terms.extend(inner.search_terms);
            }
            DIAGRAMS_KEY => parts.diagrams.extend(coerce_diagrams(value)),
            SEARCH_TERMS_KEY => parts.search_terms.extend(coerce_terms(value)),
            _ => extra.extend(keyed_item(key, value, depth)),
        }
    }

    for item in extra {
        parts.content.push_item(item);
    }
    parts
}

fn coerce_content(value: &Value, depth: usize) -> SectionContent {
    match value {
        Value::Null => SectionContent::default(),
        Value::String(text) => {
            let text = text.trim();
            if text.is_empty() {
                SectionContent::default()
            } else {
                SectionContent::Text(text.to_string())
            }
        }
        Value::Bool(_) | Value::Number(_) => SectionContent::Text(value.to_string()),
        Value::Array(items) => SectionContent::Items(
            items
                .iter()
                .filter_map(|item| stringify(item, depth + 1))
                .collect(),
        ),
        Value::Object(map) => SectionContent::Items(
            map.iter()
                .filter_map(|(key, value)| keyed_item(key, value, depth))
                .collect(),
        ),
    }
}

/// Flatten a value to one line of text; `None` when it carries no content
fn stringify(value: &Value, depth: usize) -> Option<String> {
    if depth > MAX_DEPTH {
        return Some(value.to_string());
    }
    match value {
        Value::Null => None,
        Value::String(text) => {
            let text = text.trim();
            (!text.is_empty()).then(|| text.to_string())
        }
        Value::Bool(_) | Value::Number(_) => Some(value.to_string()),
        Value::Array(items) => {
            let parts: Vec<_> = items
                .iter()
                .filter_map(|item| stringify(item, depth + 1))
                .collect();
            (!parts.is_empty()).then(|| parts.join(", "))
        }
        Value::Object(map) => {
            let parts: Vec<_> = map
                .iter()
                .filter_map(|(key, value)| keyed_item(key, value, depth))
                .collect();
            (!parts.is_empty()).then(|| parts.join("; "))
        }
    }
}

fn keyed_item(key: &str, value: &Value, depth: usize) -> Option<String> {
    let key = key.trim();
    match stringify(value, depth + 1) {
        Some(text) if key.is_empty() => Some(text),
        Some(text) => Some(format!("{key}: {text}")),
        None => (!key.is_empty()).then(|| key.to_string()),
    }
}

fn coerce_terms(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().filter_map(|item| stringify(item, 1)).collect(),
        other => stringify(other, 1).into_iter().collect(),
    }
}

fn coerce_diagrams(value: &Value) -> Vec<Diagram> {
    match value {
        Value::Array(items) => items.iter().filter_map(coerce_diagram).collect(),
        other => coerce_diagram(other).into_iter().collect(),
    }
}

fn coerce_diagram(value: &Value) -> Option<Diagram> {
    match value {
        Value::Object(map) => {
            let title = text_field(map, "title")
                .or_else(|| text_field(map, "name"))
                .unwrap_or(Diagram::UNTITLED);
            let source = text_field(map, "mermaid_code")
                .or_else(|| text_field(map, "code"))
                .map(strip_fences)
                .unwrap_or_default();
            let kind = text_field(map, "type")
                .map(DiagramKind::from_label)
                .or_else(|| DiagramKind::from_source(&source))
                .unwrap_or(DiagramKind::Other);
            Some(Diagram::new(title, kind, source))
        }
        Value::String(text) => {
            let source = strip_fences(text);
            if source.is_empty() {
                return None;
            }
            let kind = DiagramKind::from_source(&source).unwrap_or(DiagramKind::Other);
            Some(Diagram::new(Diagram::UNTITLED, kind, source))
        }
        _ => None,
    }
}

fn text_field<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    map.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|text| !text.is_empty())
}

/// Body of the first Markdown code fence, or the whole text when unfenced
fn strip_fences(text: &str) -> String {
    let body = CODE_FENCE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map_or(text, |body| body.as_str());
    body.trim().to_string()
}

fn coerce_suggestions(value: &Value) -> Vec<ImageSuggestion> {
    match value {
        Value::Null => Vec::new(),
        Value::Array(items) => items.iter().filter_map(coerce_suggestion).collect(),
        other => coerce_suggestion(other).into_iter().collect(),
    }
}

fn coerce_suggestion(value: &Value) -> Option<ImageSuggestion> {
    if let Value::Object(map) = value {
        if let Some(description) = text_field(map, "description") {
            let mut suggestion = ImageSuggestion::new(description);
            suggestion.section = text_field(map, "section").and_then(SectionName::from_key);
            return Some(suggestion);
        }
    }
    stringify(value, 1).map(ImageSuggestion::new)
}
