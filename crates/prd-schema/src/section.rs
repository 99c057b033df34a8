//! Section names and polymorphic section content
//!
//! The set of sections is closed: [`SectionName::ALL`] fixes both membership
//! and document order.

use crate::diagram::Diagram;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// One of the twelve fixed PRD sections
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SectionName {
    /// Executive Summary
    ExecutiveSummary,
    /// Problem Statement
    ProblemStatement,
    /// Target Users
    TargetUsers,
    /// Product Goals
    ProductGoals,
    /// Requirements & Features
    RequirementsAndFeatures,
    /// User Stories
    UserStories,
    /// Technical Requirements
    TechnicalRequirements,
    /// Architecture
    Architecture,
    /// Implementation Plan
    ImplementationPlan,
    /// Success Metrics
    SuccessMetrics,
    /// Risks & Mitigation
    RisksAndMitigation,
    /// References
    References,
}

impl SectionName {
    /// All sections in canonical document order
    pub const ALL: [SectionName; 12] = [
        Self::ExecutiveSummary,
        Self::ProblemStatement,
        Self::TargetUsers,
        Self::ProductGoals,
        Self::RequirementsAndFeatures,
        Self::UserStories,
        Self::TechnicalRequirements,
        Self::Architecture,
        Self::ImplementationPlan,
        Self::SuccessMetrics,
        Self::RisksAndMitigation,
        Self::References,
    ];

    /// Human-readable name, also the canonical wire key
    #[inline]
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::ExecutiveSummary => "Executive Summary",
            Self::ProblemStatement => "Problem Statement",
            Self::TargetUsers => "Target Users",
            Self::ProductGoals => "Product Goals",
            Self::RequirementsAndFeatures => "Requirements & Features",
            Self::UserStories => "User Stories",
            Self::TechnicalRequirements => "Technical Requirements",
            Self::Architecture => "Architecture",
            Self::ImplementationPlan => "Implementation Plan",
            Self::SuccessMetrics => "Success Metrics",
            Self::RisksAndMitigation => "Risks & Mitigation",
            Self::References => "References",
        }
    }

    /// Position in canonical order
    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Match a raw key against the canonical names
    ///
    /// Leading/trailing whitespace is ignored, inner whitespace runs count as
    /// a single space, and comparison is case-insensitive. Nothing fuzzier.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        let folded = fold_key(key);
        Self::ALL
            .into_iter()
            .find(|name| name.display_name().to_lowercase() == folded)
    }

    /// First section whose display name occurs in `text`, case-insensitively
    #[must_use]
    pub fn mentioned_in(text: &str) -> Option<Self> {
        let folded = fold_key(text);
        Self::ALL
            .into_iter()
            .find(|name| folded.contains(&name.display_name().to_lowercase()))
    }
}

impl Display for SectionName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

fn fold_key(key: &str) -> String {
    key.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Section body: a single text block or an ordered list of items
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionContent {
    /// One block of prose
    Text(String),
    /// Ordered list of text items
    Items(Vec<String>),
}

impl SectionContent {
    /// Whether there is nothing to render
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(text) => text.trim().is_empty(),
            Self::Items(items) => items.is_empty(),
        }
    }

    /// Content as a sequence of text entries
    pub fn entries(&self) -> impl Iterator<Item = &str> {
        let slice: &[String] = match self {
            Self::Text(text) => std::slice::from_ref(text),
            Self::Items(items) => items,
        };
        slice.iter().map(String::as_str)
    }

    /// Append an item, converting a text block into a one-item list first
    pub fn push_item(&mut self, item: impl Into<String>) {
        match self {
            Self::Items(items) => items.push(item.into()),
            Self::Text(text) => {
                let mut items = Vec::with_capacity(2);
                if !text.trim().is_empty() {
                    items.push(std::mem::take(text));
                }
                items.push(item.into());
                *self = Self::Items(items);
            }
        }
    }
}

impl Default for SectionContent {
    fn default() -> Self {
        Self::Items(Vec::new())
    }
}

/// One named section of a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Which section this is
    pub name: SectionName,
    /// Section body
    pub content: SectionContent,
    /// Attached diagrams (Architecture)
    pub diagrams: Vec<Diagram>,
    /// Web-search terms (References)
    pub search_terms: Vec<String>,
}

impl Section {
    /// Create an empty section
    #[inline]
    #[must_use]
    pub fn empty(name: SectionName) -> Self {
        Self {
            name,
            content: SectionContent::default(),
            diagrams: Vec::new(),
            search_terms: Vec::new(),
        }
    }

    /// With content
    #[inline]
    #[must_use]
    pub fn with_content(mut self, content: SectionContent) -> Self {
        self.content = content;
        self
    }

    /// With a diagram appended
    #[inline]
    #[must_use]
    pub fn with_diagram(mut self, diagram: Diagram) -> Self {
        self.diagrams.push(diagram);
        self
    }

    /// Whether content, diagrams and search terms are all absent
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.content.is_empty() && self.diagrams.is_empty() && self.search_terms.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_order_matches_index() {
        for (i, name) in SectionName::ALL.iter().enumerate() {
            assert_eq!(name.index(), i);
        }
    }

    #[test]
    fn from_key_tolerates_case_and_whitespace() {
        assert_eq!(
            SectionName::from_key("  executive   SUMMARY "),
            Some(SectionName::ExecutiveSummary)
        );
        assert_eq!(
            SectionName::from_key("requirements & features"),
            Some(SectionName::RequirementsAndFeatures)
        );
    }

    #[test]
    fn from_key_rejects_near_misses() {
        assert_eq!(SectionName::from_key("Executive Summaries"), None);
        assert_eq!(SectionName::from_key("Requirements and Features"), None);
        assert_eq!(SectionName::from_key("ExecutiveSummary"), None);
    }

    #[test]
    fn mentioned_in_finds_first_canonical_section() {
        assert_eq!(
            SectionName::mentioned_in("Diagram for the architecture overview"),
            Some(SectionName::Architecture)
        );
        assert_eq!(SectionName::mentioned_in("a happy user"), None);
    }

    #[test]
    fn push_item_promotes_text_block() {
        let mut content = SectionContent::Text("Intro".to_string());
        content.push_item("Extra");
        assert_eq!(
            content,
            SectionContent::Items(vec!["Intro".to_string(), "Extra".to_string()])
        );
    }

    #[test]
    fn push_item_drops_blank_text_block() {
        let mut content = SectionContent::Text("  ".to_string());
        content.push_item("Only");
        assert_eq!(content, SectionContent::Items(vec!["Only".to_string()]));
    }

    #[test]
    fn empty_section_is_blank() {
        let section = Section::empty(SectionName::Architecture);
        assert!(section.is_blank());
        assert!(section.content.is_empty());
    }
}
