//! The document root
//!
//! A [`Document`] always carries all twelve sections in canonical order when
//! built with [`Document::new`]. [`Document::from_parts`] accepts arbitrary
//! section lists; consumers that depend on the shape call
//! [`Document::check_shape`].

use crate::hash::ContentHash;
use crate::image::ImageSuggestion;
use crate::section::{Section, SectionName};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

#[allow(clippy::expect_used)]
static URL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"https?://[^\s<>"')\]]+"#).expect("valid URL pattern"));

/// A citation from the References section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    /// Citation text as written
    pub citation: String,
    /// First URL found in the citation
    pub url: Option<String>,
}

impl Reference {
    /// Parse a reference item
    #[must_use]
    pub fn parse(citation: &str) -> Self {
        let url = URL_PATTERN
            .find(citation)
            .map(|m| m.as_str().trim_end_matches(['.', ',', ';']).to_string());
        Self {
            citation: citation.to_string(),
            url,
        }
    }
}

/// Ways a document can violate its section contract
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShapeViolation {
    /// Wrong number of sections
    #[error("expected {expected} sections, found {found}")]
    SectionCount { expected: usize, found: usize },

    /// Section out of canonical order
    #[error("section {found} at position {position}, expected {expected}")]
    OutOfOrder {
        position: usize,
        expected: SectionName,
        found: SectionName,
    },
}

/// A normalized product requirement document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    sections: Vec<Section>,
    /// Image requests, in input order
    pub image_suggestions: Vec<ImageSuggestion>,
    /// Unrecognized top-level keys, in input order
    pub metadata: Map<String, Value>,
}

impl Document {
    /// Create a document with every section empty
    #[must_use]
    pub fn new() -> Self {
        Self {
            sections: SectionName::ALL.into_iter().map(Section::empty).collect(),
            image_suggestions: Vec::new(),
            metadata: Map::new(),
        }
    }

    /// Assemble a document from raw parts without checking the section list
    #[must_use]
    pub fn from_parts(
        sections: Vec<Section>,
        image_suggestions: Vec<ImageSuggestion>,
        metadata: Map<String, Value>,
    ) -> Self {
        Self {
            sections,
            image_suggestions,
            metadata,
        }
    }

    /// Verify all twelve sections are present in canonical order
    ///
    /// # Errors
    /// Returns the first violation found
    pub fn check_shape(&self) -> Result<(), ShapeViolation> {
        if self.sections.len() != SectionName::ALL.len() {
            return Err(ShapeViolation::SectionCount {
                expected: SectionName::ALL.len(),
                found: self.sections.len(),
            });
        }
        for (position, (section, expected)) in
            self.sections.iter().zip(SectionName::ALL).enumerate()
        {
            if section.name != expected {
                return Err(ShapeViolation::OutOfOrder {
                    position,
                    expected,
                    found: section.name,
                });
            }
        }
        Ok(())
    }

    /// Sections in document order
    #[inline]
    #[must_use]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Look up a section
    #[must_use]
    pub fn section(&self, name: SectionName) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// Look up a section mutably
    pub fn section_mut(&mut self, name: SectionName) -> Option<&mut Section> {
        self.sections.iter_mut().find(|s| s.name == name)
    }

    /// Mutable access to every section
    pub fn sections_mut(&mut self) -> impl Iterator<Item = &mut Section> {
        self.sections.iter_mut()
    }

    /// Whether every section is blank
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.sections.iter().all(Section::is_blank)
    }

    /// Canonical JSON form
    #[must_use]
    pub fn to_canonical_json(&self) -> Value {
        crate::wire::to_value(self)
    }

    /// Blake3 fingerprint of the canonical JSON form
    #[must_use]
    pub fn fingerprint(&self) -> ContentHash {
        ContentHash::compute_json(&self.to_canonical_json())
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::section::SectionContent;

    #[test]
    fn url_pattern_compiles() {
        Lazy::force(&URL_PATTERN);
    }

    #[test]
    fn new_document_has_all_sections_in_order() {
        let doc = Document::new();
        assert!(doc.check_shape().is_ok());
        assert!(doc.is_blank());
        let names: Vec<_> = doc.sections().iter().map(|s| s.name).collect();
        assert_eq!(names, SectionName::ALL.to_vec());
    }

    #[test]
    fn check_shape_reports_missing_section() {
        let mut sections: Vec<_> = SectionName::ALL.into_iter().map(Section::empty).collect();
        sections.pop();
        let doc = Document::from_parts(sections, Vec::new(), Map::new());
        assert_eq!(
            doc.check_shape(),
            Err(ShapeViolation::SectionCount { expected: 12, found: 11 })
        );
    }

    #[test]
    fn check_shape_reports_reordering() {
        let mut sections: Vec<_> = SectionName::ALL.into_iter().map(Section::empty).collect();
        sections.swap(0, 1);
        let doc = Document::from_parts(sections, Vec::new(), Map::new());
        assert!(matches!(
            doc.check_shape(),
            Err(ShapeViolation::OutOfOrder { position: 0, .. })
        ));
    }

    #[test]
    fn reference_parse_trims_trailing_punctuation() {
        let reference = Reference::parse("Rust Book - https://doc.rust-lang.org/book/.");
        assert_eq!(reference.url.as_deref(), Some("https://doc.rust-lang.org/book/"));
        assert_eq!(Reference::parse("Internal interview notes").url, None);
    }

    #[test]
    fn fingerprint_tracks_content() {
        let a = Document::new();
        let mut b = Document::new();
        assert_eq!(a.fingerprint(), b.fingerprint());
        if let Some(section) = b.section_mut(SectionName::ExecutiveSummary) {
            section.content = SectionContent::Text("Hello".into());
        }
        assert_ne!(a.fingerprint(), b.fingerprint());
    }
}
