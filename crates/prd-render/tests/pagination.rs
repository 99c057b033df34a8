//! Paginated text renderer behaviour

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use prd_assemble::{Block, DiagramRendering, Figure};
use prd_render::{FooterMetadata, PaginatedTextRenderer, RenderError, Renderer};
use prd_schema::{DiagramKind, ImageHandle};
use proptest::prelude::*;

fn footer() -> FooterMetadata {
    let at = NaiveDate::from_ymd_opt(2024, 11, 2)
        .unwrap()
        .and_hms_opt(14, 30, 0)
        .unwrap();
    FooterMetadata::new(at)
}

fn renderer() -> PaginatedTextRenderer {
    PaginatedTextRenderer::new(60, 16).unwrap()
}

fn sample_blocks() -> Vec<Block> {
    vec![
        Block::heading("Product Requirements Document", 1),
        Block::heading("Executive Summary", 2),
        Block::paragraph("CarbonTrack helps **households** measure their footprint."),
        Block::PageBreak,
        Block::heading("Architecture", 2),
        Block::bullets(vec!["API layer".into(), "Worker pool".into()]),
        Block::DiagramImage {
            title: "Overview".into(),
            diagram_kind: DiagramKind::Flowchart,
            rendering: DiagramRendering::Fallback {
                source: "graph TD\nA-->B".into(),
            },
        },
        Block::Image {
            figures: vec![Figure {
                handle: ImageHandle::Url("https://img.test/family.jpg".into()),
                caption: "Family at home".into(),
            }],
        },
    ]
}

#[test]
fn every_page_has_size_and_footer() {
    let artifact = renderer().render(&sample_blocks(), &footer()).unwrap();
    assert_eq!(artifact.page_count(), 2);
    for (i, page) in artifact.pages.iter().enumerate() {
        let lines: Vec<_> = page.lines().collect();
        assert_eq!(lines.len(), 16);
        assert_eq!(
            lines[15],
            format!("Powered by AI | Page {} of 2 | 2024-11-02 14:30", i + 1)
        );
        assert!(lines.iter().all(|l| l.chars().count() <= 60));
    }
}

#[test]
fn first_page_layout() {
    let artifact = renderer().render(&sample_blocks(), &footer()).unwrap();
    let lines: Vec<_> = artifact.pages[0].lines().take(6).collect();
    assert_eq!(lines[0], "PRODUCT REQUIREMENTS DOCUMENT");
    assert_eq!(lines[1], "=".repeat(lines[0].len()));
    assert_eq!(lines[2], "");
    assert_eq!(lines[3], "Executive Summary");
    assert_eq!(lines[4], "-".repeat(lines[3].len()));
    assert_eq!(lines[5], "");
    assert!(artifact.pages[0].contains("CarbonTrack helps households measure their footprint."));
}

#[test]
fn fallback_diagram_shows_source() {
    let artifact = renderer().render(&sample_blocks(), &footer()).unwrap();
    let page = &artifact.pages[1];
    assert!(page.contains("[Diagram] Overview (flowchart), shown as source"));
    assert!(page.contains("    | graph TD"));
    assert!(page.contains("    | A-->B"));
    assert!(page.contains("[Image] Family at home"));
    assert!(page.contains("https://img.test/family.jpg"));
}

#[test]
fn item_text_starting_with_block_syntax_is_kept() {
    let blocks = vec![
        Block::heading("Implementation Plan", 2),
        Block::bullets(vec![
            "2024. Launch".into(),
            "# of users: 500".into(),
            "---".into(),
            "> 99.9% uptime".into(),
        ]),
        Block::paragraph("1) Pilot with **ten** households"),
    ];
    let artifact = renderer().render(&blocks, &footer()).unwrap();
    let lines: Vec<_> = artifact.pages[0].lines().collect();
    for expected in [
        "  \u{2022} 2024. Launch",
        "  \u{2022} # of users: 500",
        "  \u{2022} ---",
        "  \u{2022} > 99.9% uptime",
        "1) Pilot with ten households",
    ] {
        assert!(lines.contains(&expected), "missing {expected:?} in {lines:#?}");
    }
}

#[test]
fn long_content_overflows_onto_new_pages() {
    let items = (0..40).map(|i| format!("Requirement {i}")).collect();
    let blocks = vec![Block::heading("Requirements & Features", 2), Block::bullets(items)];
    let artifact = renderer().render(&blocks, &footer()).unwrap();
    assert!(artifact.page_count() > 3);
    let total = artifact.page_count();
    assert!(artifact.pages[total - 1].contains(&format!("Page {total} of {total}")));
    assert!(artifact.pages.iter().any(|p| p.contains("Requirement 39")));
}

#[test]
fn empty_input_still_yields_one_page() {
    let artifact = renderer().render(&[], &footer()).unwrap();
    assert_eq!(artifact.page_count(), 1);
    assert!(artifact.pages[0].contains("Page 1 of 1"));
}

#[test]
fn tiny_pages_are_rejected() {
    assert!(matches!(
        PaginatedTextRenderer::new(10, 3),
        Err(RenderError::InvalidPageSize { .. })
    ));
}

proptest! {
    #[test]
    fn prop_rendering_is_deterministic(
        paragraphs in proptest::collection::vec("[a-zA-Z ]{0,200}", 0..12),
        breaks in proptest::collection::vec(any::<bool>(), 12),
    ) {
        let mut blocks = Vec::new();
        for (i, text) in paragraphs.iter().enumerate() {
            blocks.push(Block::paragraph(text.clone()));
            if breaks[i] {
                blocks.push(Block::PageBreak);
            }
        }
        let first = renderer().render(&blocks, &footer()).unwrap();
        let second = renderer().render(&blocks, &footer()).unwrap();
        prop_assert_eq!(first.to_bytes(), second.to_bytes());
        for page in &first.pages {
            prop_assert_eq!(page.lines().count(), 16);
        }
    }
}
