//! Renderer seam and the paginated text renderer

use crate::artifact::{FooterMetadata, RenderedArtifact};
use crate::error::RenderError;
use crate::text::{strip_markdown, truncate, wrap, wrap_prefixed};
use prd_assemble::{Block, DiagramRendering, Figure};

/// Draws a block sequence into a paginated artifact
pub trait Renderer: Send + Sync {
    /// Render blocks in order, stamping every page with `footer`
    ///
    /// # Errors
    /// Returns [`RenderError`] if the output cannot be produced
    fn render(&self, blocks: &[Block], footer: &FooterMetadata)
        -> Result<RenderedArtifact, RenderError>;

    /// MIME type of produced artifacts
    fn media_type(&self) -> &'static str;
}

/// Smallest usable page width
pub const MIN_WIDTH: usize = 40;
/// Smallest usable page height
pub const MIN_HEIGHT: usize = 6;

const FOOTER_LINES: usize = 2;
const BULLET: &str = "  \u{2022} ";
const BULLET_INDENT: &str = "    ";
const SOURCE_INDENT: &str = "    | ";

/// Fixed-size plain-text pages with a footer on each
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginatedTextRenderer {
    width: usize,
    height: usize,
}

impl Default for PaginatedTextRenderer {
    fn default() -> Self {
        Self {
            width: 96,
            height: 60,
        }
    }
}

impl PaginatedTextRenderer {
    /// Renderer for `width` columns by `height` lines
    ///
    /// # Errors
    /// Returns [`RenderError::InvalidPageSize`] below [`MIN_WIDTH`] x [`MIN_HEIGHT`]
    pub fn new(width: usize, height: usize) -> Result<Self, RenderError> {
        if width < MIN_WIDTH || height < MIN_HEIGHT {
            return Err(RenderError::InvalidPageSize {
                width,
                height,
                min_width: MIN_WIDTH,
                min_height: MIN_HEIGHT,
            });
        }
        Ok(Self { width, height })
    }

    /// Page width in columns
    #[inline]
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Page height in lines
    #[inline]
    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    fn body_height(&self) -> usize {
        self.height - FOOTER_LINES
    }

    /// Lay blocks out as body lines, `None` marking a forced page break
    fn layout(&self, blocks: &[Block]) -> Vec<Option<String>> {
        let mut lines = Vec::new();
        for block in blocks {
            if matches!(block, Block::PageBreak) {
                lines.push(None);
            } else {
                lines.extend(self.block_lines(block).into_iter().map(Some));
                lines.push(Some(String::new()));
            }
        }
        lines
    }

    fn block_lines(&self, block: &Block) -> Vec<String> {
        let mut out = Vec::new();
        match block {
            Block::Heading { text, level } => {
                let text = strip_markdown(text).replace('\n', " ");
                let (title, rule) = if *level <= 1 {
                    (text.to_uppercase(), "=")
                } else {
                    (text, "-")
                };
                out.extend(wrap(&title, self.width));
                let rule_len = out.iter().map(|l| l.chars().count()).max().unwrap_or(0);
                out.push(rule.repeat(rule_len));
            }
            Block::Paragraph { text } => {
                for (i, paragraph) in strip_markdown(text).lines().enumerate() {
                    if i > 0 {
                        out.push(String::new());
                    }
                    out.extend(wrap(paragraph, self.width));
                }
            }
            Block::BulletList { items } => {
                for item in items {
                    let text = strip_markdown(item).replace('\n', " ");
                    out.extend(wrap_prefixed(&text, self.width, BULLET, BULLET_INDENT));
                }
            }
            Block::Image { figures } => {
                for Figure { handle, caption } in figures {
                    out.extend(wrap_prefixed(caption, self.width, "[Image] ", BULLET_INDENT));
                    out.push(truncate(&format!("{BULLET_INDENT}{handle}"), self.width));
                }
            }
            Block::DiagramImage {
                title,
                diagram_kind,
                rendering,
            } => match rendering {
                DiagramRendering::Rendered { handle } => {
                    let label = format!("{title} ({diagram_kind})");
                    out.extend(wrap_prefixed(&label, self.width, "[Diagram] ", BULLET_INDENT));
                    out.push(truncate(&format!("{BULLET_INDENT}{handle}"), self.width));
                }
                DiagramRendering::Fallback { source } => {
                    let label = format!("{title} ({diagram_kind}), shown as source");
                    out.extend(wrap_prefixed(&label, self.width, "[Diagram] ", BULLET_INDENT));
                    out.extend(source.lines().map(|line| {
                        truncate(&format!("{SOURCE_INDENT}{}", line.trim_end()), self.width)
                    }));
                }
            },
            Block::PageBreak => {}
        }
        out
    }

    fn paginate(&self, lines: Vec<Option<String>>) -> Vec<Vec<String>> {
        let body = self.body_height();
        let mut pages: Vec<Vec<String>> = Vec::new();
        let mut page: Vec<String> = Vec::new();

        for line in lines {
            match line {
                None => {
                    if !page.is_empty() {
                        pages.push(std::mem::take(&mut page));
                    }
                }
                Some(text) => {
                    if page.is_empty() && text.is_empty() {
                        continue;
                    }
                    if page.len() == body {
                        pages.push(std::mem::take(&mut page));
                        if text.is_empty() {
                            continue;
                        }
                    }
                    page.push(text);
                }
            }
        }
        if !page.is_empty() || pages.is_empty() {
            pages.push(page);
        }
        pages
    }

    fn footer_line(&self, footer: &FooterMetadata, page: usize, total: usize) -> String {
        let text = format!(
            "{} | Page {page} of {total} | {}",
            footer.attribution,
            footer.timestamp()
        );
        truncate(&text, self.width)
    }
}

impl Renderer for PaginatedTextRenderer {
    fn render(
        &self,
        blocks: &[Block],
        footer: &FooterMetadata,
    ) -> Result<RenderedArtifact, RenderError> {
        let pages = self.paginate(self.layout(blocks));
        let total = pages.len();
        let body = self.body_height();

        let pages = pages
            .into_iter()
            .enumerate()
            .map(|(i, mut lines)| {
                while lines.last().is_some_and(String::is_empty) {
                    lines.pop();
                }
                lines.resize(body, String::new());
                lines.push("-".repeat(self.width));
                lines.push(self.footer_line(footer, i + 1, total));
                let mut page = lines.join("\n");
                page.push('\n');
                page
            })
            .collect::<Vec<_>>();

        tracing::debug!(blocks = blocks.len(), pages = pages.len(), "rendered text artifact");
        Ok(RenderedArtifact {
            pages,
            media_type: self.media_type(),
        })
    }

    fn media_type(&self) -> &'static str {
        "text/plain; charset=utf-8"
    }
}
