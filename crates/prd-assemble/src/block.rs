//! Renderable blocks
//!
//! Blocks are final: a renderer draws them in order without looking back at
//! the document.

use prd_schema::{DiagramKind, ImageHandle};
use serde::Serialize;

/// One image with its caption
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Figure {
    /// Image to draw
    pub handle: ImageHandle,
    /// Caption text
    pub caption: String,
}

/// How a diagram is shown
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum DiagramRendering {
    /// Rendered image
    Rendered { handle: ImageHandle },
    /// Diagram source shown as text
    Fallback { source: String },
}

/// A unit of rendered output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Block {
    /// Heading; level 1 is the document title
    Heading { text: String, level: u8 },
    /// Prose paragraph
    Paragraph { text: String },
    /// Bulleted list, items verbatim
    BulletList { items: Vec<String> },
    /// One or more images
    Image { figures: Vec<Figure> },
    /// Architecture diagram
    DiagramImage {
        title: String,
        diagram_kind: DiagramKind,
        rendering: DiagramRendering,
    },
    /// Start a new page
    PageBreak,
}

impl Block {
    /// Heading block
    #[inline]
    #[must_use]
    pub fn heading(text: impl Into<String>, level: u8) -> Self {
        Self::Heading {
            text: text.into(),
            level,
        }
    }

    /// Paragraph block
    #[inline]
    #[must_use]
    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::Paragraph { text: text.into() }
    }

    /// Bullet list block
    #[inline]
    #[must_use]
    pub fn bullets(items: Vec<String>) -> Self {
        Self::BulletList { items }
    }

    /// Short kind label, for logs
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Heading { .. } => "heading",
            Self::Paragraph { .. } => "paragraph",
            Self::BulletList { .. } => "bullet_list",
            Self::Image { .. } => "image",
            Self::DiagramImage { .. } => "diagram_image",
            Self::PageBreak => "page_break",
        }
    }

    /// Whether this is a diagram drawn from source text
    #[must_use]
    pub fn is_diagram_fallback(&self) -> bool {
        matches!(
            self,
            Self::DiagramImage {
                rendering: DiagramRendering::Fallback { .. },
                ..
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_with_kind_tag() {
        let value = serde_json::to_value(Block::heading("Architecture", 2)).unwrap();
        assert_eq!(value, json!({"kind": "heading", "text": "Architecture", "level": 2}));

        let value = serde_json::to_value(Block::PageBreak).unwrap();
        assert_eq!(value, json!({"kind": "page_break"}));
    }

    #[test]
    fn diagram_fallback_is_detected() {
        let block = Block::DiagramImage {
            title: "T".into(),
            diagram_kind: DiagramKind::Flowchart,
            rendering: DiagramRendering::Fallback {
                source: "graph TD".into(),
            },
        };
        assert!(block.is_diagram_fallback());
        assert_eq!(block.kind(), "diagram_image");
        assert!(!Block::paragraph("x").is_diagram_fallback());
    }
}
