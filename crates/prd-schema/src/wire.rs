//! Canonical JSON emission
//!
//! Sections come first in canonical order, then `image_suggestions`, then
//! metadata in its original order. A section collapses to a bare string or
//! list unless it carries diagrams or search terms.

use crate::diagram::Diagram;
use crate::document::Document;
use crate::image::ImageSuggestion;
use crate::section::{Section, SectionContent};
use serde_json::{json, Map, Value};

pub(crate) fn to_value(document: &Document) -> Value {
    let mut root = Map::new();
    for section in document.sections() {
        root.insert(section.name.display_name().to_string(), section_value(section));
    }
    root.insert(
        "image_suggestions".to_string(),
        Value::Array(
            document
                .image_suggestions
                .iter()
                .map(suggestion_value)
                .collect(),
        ),
    );
    for (key, value) in &document.metadata {
        root.entry(key.clone()).or_insert_with(|| value.clone());
    }
    Value::Object(root)
}

fn content_value(content: &SectionContent) -> Value {
    match content {
        SectionContent::Text(text) => Value::String(text.clone()),
        SectionContent::Items(items) => {
            Value::Array(items.iter().cloned().map(Value::String).collect())
        }
    }
}

fn section_value(section: &Section) -> Value {
    let content = content_value(&section.content);
    if section.diagrams.is_empty() && section.search_terms.is_empty() {
        return content;
    }
    let mut object = Map::new();
    object.insert("content".to_string(), content);
    if !section.diagrams.is_empty() {
        object.insert(
            "diagrams".to_string(),
            Value::Array(section.diagrams.iter().map(diagram_value).collect()),
        );
    }
    if !section.search_terms.is_empty() {
        object.insert(
            "search_terms".to_string(),
            Value::Array(
                section
                    .search_terms
                    .iter()
                    .cloned()
                    .map(Value::String)
                    .collect(),
            ),
        );
    }
    Value::Object(object)
}

fn diagram_value(diagram: &Diagram) -> Value {
    json!({
        "title": diagram.title,
        "type": diagram.kind.as_str(),
        "mermaid_code": diagram.source,
    })
}

fn suggestion_value(suggestion: &ImageSuggestion) -> Value {
    match suggestion.section {
        None => Value::String(suggestion.description.clone()),
        Some(section) => json!({
            "description": suggestion.description,
            "section": section.display_name(),
        }),
    }
}
