//! Document to block sequence

use crate::block::{Block, DiagramRendering, Figure};
use crate::error::AssemblyError;
use prd_schema::{Diagram, Document, ImageSuggestion, RenderStatus, Section, SectionContent, SectionName};
use std::collections::BTreeMap;

/// Paragraph emitted when no section has anything to show
pub const EMPTY_DOCUMENT_TEXT: &str = "No content was generated for this document.";

/// Assembly options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblyOptions {
    /// Leading level-1 heading
    pub title: Option<String>,
    /// Emit a page break between sections
    pub page_breaks: bool,
}

impl Default for AssemblyOptions {
    fn default() -> Self {
        Self {
            title: None,
            page_breaks: true,
        }
    }
}

impl AssemblyOptions {
    /// With a document title
    #[inline]
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// With page breaks toggled
    #[inline]
    #[must_use]
    pub fn with_page_breaks(mut self, enabled: bool) -> Self {
        self.page_breaks = enabled;
        self
    }
}

/// Builds the block sequence for a document
#[derive(Debug, Clone, Default)]
pub struct Assembler {
    options: AssemblyOptions,
}

impl Assembler {
    /// Assembler with default options
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Assembler with the given options
    #[must_use]
    pub fn with_options(options: AssemblyOptions) -> Self {
        Self { options }
    }

    /// Active options
    #[inline]
    #[must_use]
    pub fn options(&self) -> &AssemblyOptions {
        &self.options
    }

    /// Lay out `document` as blocks
    ///
    /// Sections come in canonical order and empty ones are skipped. Every
    /// diagram appears, rendered or as source text, and every resolved image
    /// appears exactly once: under the section it belongs to, or in a
    /// trailing gallery.
    ///
    /// # Errors
    /// Returns [`AssemblyError::Impossible`] if the document does not hold
    /// the twelve sections in canonical order
    #[tracing::instrument(skip_all)]
    pub fn assemble(&self, document: &Document) -> Result<Vec<Block>, AssemblyError> {
        document.check_shape()?;

        let (placed, gallery) = partition_images(&document.image_suggestions);
        let mut blocks = Vec::new();
        if let Some(title) = &self.options.title {
            blocks.push(Block::heading(title.clone(), 1));
        }

        let mut emitted = 0usize;
        for section in document.sections() {
            let figures = placed.get(&section.name).cloned().unwrap_or_default();
            if section.content.is_empty() && section.diagrams.is_empty() && figures.is_empty() {
                continue;
            }
            if emitted > 0 && self.options.page_breaks {
                blocks.push(Block::PageBreak);
            }
            emit_section(&mut blocks, section, figures);
            emitted += 1;
        }

        if !gallery.is_empty() {
            blocks.push(Block::Image { figures: gallery });
        }
        if emitted == 0 && blocks.iter().all(|b| matches!(b, Block::Heading { .. })) {
            blocks.push(Block::paragraph(EMPTY_DOCUMENT_TEXT));
        }

        tracing::debug!(
            sections = emitted,
            blocks = blocks.len(),
            fallbacks = blocks.iter().filter(|b| b.is_diagram_fallback()).count(),
            "document assembled"
        );
        Ok(blocks)
    }
}

/// Assemble with default options
///
/// # Errors
/// See [`Assembler::assemble`]
pub fn assemble(document: &Document) -> Result<Vec<Block>, AssemblyError> {
    Assembler::new().assemble(document)
}

fn emit_section(blocks: &mut Vec<Block>, section: &Section, figures: Vec<Figure>) {
    blocks.push(Block::heading(section.name.display_name(), 2));
    match &section.content {
        SectionContent::Text(text) if !text.trim().is_empty() => {
            blocks.push(Block::paragraph(text.trim()));
        }
        SectionContent::Items(items) if !items.is_empty() => {
            blocks.push(Block::bullets(items.clone()));
        }
        _ => {}
    }
    blocks.extend(section.diagrams.iter().map(diagram_block));
    if !figures.is_empty() {
        blocks.push(Block::Image { figures });
    }
}

fn diagram_block(diagram: &Diagram) -> Block {
    let rendering = match &diagram.status {
        RenderStatus::Rendered(handle) => DiagramRendering::Rendered {
            handle: handle.clone(),
        },
        RenderStatus::Pending | RenderStatus::Failed(_) => DiagramRendering::Fallback {
            source: diagram.source.clone(),
        },
    };
    Block::DiagramImage {
        title: diagram.title.clone(),
        diagram_kind: diagram.kind,
        rendering,
    }
}

/// Resolved images grouped by owning section, plus the unplaced rest
fn partition_images(
    suggestions: &[ImageSuggestion],
) -> (BTreeMap<SectionName, Vec<Figure>>, Vec<Figure>) {
    let mut placed: BTreeMap<SectionName, Vec<Figure>> = BTreeMap::new();
    let mut gallery = Vec::new();
    for suggestion in suggestions {
        let Some(asset) = &suggestion.image else {
            continue;
        };
        let figure = Figure {
            handle: asset.handle.clone(),
            caption: suggestion.description.trim().to_string(),
        };
        match asset.owner {
            Some(owner) => placed.entry(owner).or_default().push(figure),
            None => gallery.push(figure),
        }
    }
    (placed, gallery)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use prd_schema::{DiagramKind, ImageAsset, ImageHandle, RenderFailure};

    fn url(s: &str) -> ImageHandle {
        ImageHandle::Url(s.to_string())
    }

    fn resolved(description: &str, owner: Option<SectionName>, image: &str) -> ImageSuggestion {
        ImageSuggestion {
            description: description.to_string(),
            section: None,
            image: Some(ImageAsset {
                handle: url(image),
                owner,
            }),
        }
    }

    #[test]
    fn empty_document_gets_placeholder() {
        let blocks = assemble(&Document::new()).unwrap();
        assert_eq!(blocks, vec![Block::paragraph(EMPTY_DOCUMENT_TEXT)]);
    }

    #[test]
    fn empty_document_with_title_keeps_title() {
        let assembler =
            Assembler::with_options(AssemblyOptions::default().with_title("Product Requirements Document"));
        let blocks = assembler.assemble(&Document::new()).unwrap();
        assert_eq!(
            blocks,
            vec![
                Block::heading("Product Requirements Document", 1),
                Block::paragraph(EMPTY_DOCUMENT_TEXT),
            ]
        );
    }

    #[test]
    fn page_breaks_separate_sections_only() {
        let mut doc = Document::new();
        doc.section_mut(SectionName::ExecutiveSummary).unwrap().content =
            SectionContent::Text("Summary".into());
        doc.section_mut(SectionName::SuccessMetrics).unwrap().content =
            SectionContent::Items(vec!["MAU".into()]);

        assert_eq!(
            assemble(&doc).unwrap(),
            vec![
                Block::heading("Executive Summary", 2),
                Block::paragraph("Summary"),
                Block::PageBreak,
                Block::heading("Success Metrics", 2),
                Block::bullets(vec!["MAU".into()]),
            ]
        );

        let flat = Assembler::with_options(AssemblyOptions::default().with_page_breaks(false))
            .assemble(&doc)
            .unwrap();
        assert!(!flat.contains(&Block::PageBreak));
    }

    #[test]
    fn failed_and_rendered_diagrams_both_appear() {
        let mut rendered = Diagram::new("Overview", DiagramKind::Flowchart, "graph TD\nA-->B");
        rendered.status = RenderStatus::Rendered(url("https://img/overview.png"));
        let mut failed = Diagram::new("Flow", DiagramKind::Sequence, "sequenceDiagram\nA->>B: hi");
        failed.status = RenderStatus::Failed(RenderFailure::Timeout);

        let mut doc = Document::new();
        let arch = doc.section_mut(SectionName::Architecture).unwrap();
        arch.diagrams = vec![rendered, failed];

        let blocks = assemble(&doc).unwrap();
        assert_eq!(
            blocks,
            vec![
                Block::heading("Architecture", 2),
                Block::DiagramImage {
                    title: "Overview".into(),
                    diagram_kind: DiagramKind::Flowchart,
                    rendering: DiagramRendering::Rendered {
                        handle: url("https://img/overview.png")
                    },
                },
                Block::DiagramImage {
                    title: "Flow".into(),
                    diagram_kind: DiagramKind::Sequence,
                    rendering: DiagramRendering::Fallback {
                        source: "sequenceDiagram\nA->>B: hi".into()
                    },
                },
            ]
        );
    }

    #[test]
    fn images_go_under_owner_or_into_gallery() {
        let mut doc = Document::new();
        doc.section_mut(SectionName::TargetUsers).unwrap().content =
            SectionContent::Items(vec!["Households".into()]);
        doc.image_suggestions = vec![
            resolved("Family at home", Some(SectionName::TargetUsers), "https://img/family.jpg"),
            ImageSuggestion::new("Never found"),
            resolved("Green energy", None, "https://img/green.jpg"),
        ];

        let blocks = assemble(&doc).unwrap();
        assert_eq!(
            blocks,
            vec![
                Block::heading("Target Users", 2),
                Block::bullets(vec!["Households".into()]),
                Block::Image {
                    figures: vec![Figure {
                        handle: url("https://img/family.jpg"),
                        caption: "Family at home".into(),
                    }]
                },
                Block::Image {
                    figures: vec![Figure {
                        handle: url("https://img/green.jpg"),
                        caption: "Green energy".into(),
                    }]
                },
            ]
        );
    }

    #[test]
    fn image_alone_makes_section_non_empty() {
        let mut doc = Document::new();
        doc.image_suggestions = vec![resolved(
            "Roadmap",
            Some(SectionName::ImplementationPlan),
            "https://img/roadmap.jpg",
        )];
        let blocks = assemble(&doc).unwrap();
        assert_eq!(blocks[0], Block::heading("Implementation Plan", 2));
        assert_eq!(blocks.len(), 2);
    }

    #[test]
    fn broken_shape_is_impossible() {
        let doc = Document::from_parts(
            vec![Section::empty(SectionName::References)],
            Vec::new(),
            serde_json::Map::new(),
        );
        assert!(matches!(assemble(&doc), Err(AssemblyError::Impossible(_))));
    }
}
