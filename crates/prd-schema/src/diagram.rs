//! Mermaid diagrams and their render state

use crate::image::ImageHandle;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Mermaid header keywords accepted as the start of a diagram
const MERMAID_HEADERS: &[(&str, DiagramKind)] = &[
    ("graph", DiagramKind::Flowchart),
    ("flowchart", DiagramKind::Flowchart),
    ("sequenceDiagram", DiagramKind::Sequence),
    ("classDiagram", DiagramKind::Class),
    ("gantt", DiagramKind::Gantt),
    ("erDiagram", DiagramKind::Other),
    ("stateDiagram-v2", DiagramKind::Other),
    ("stateDiagram", DiagramKind::Other),
    ("pie", DiagramKind::Other),
    ("journey", DiagramKind::Other),
    ("gitGraph", DiagramKind::Other),
    ("mindmap", DiagramKind::Other),
    ("timeline", DiagramKind::Other),
];

/// Diagram type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagramKind {
    /// Flowchart / graph
    Flowchart,
    /// Sequence diagram
    Sequence,
    /// Class diagram
    Class,
    /// Gantt chart
    Gantt,
    /// Anything else Mermaid understands
    Other,
}

impl DiagramKind {
    /// Canonical wire label
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Flowchart => "flowchart",
            Self::Sequence => "sequence",
            Self::Class => "class",
            Self::Gantt => "gantt",
            Self::Other => "other",
        }
    }

    /// Parse a free-form type label, case-insensitive
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "flowchart" | "graph" | "flow" => Self::Flowchart,
            "sequence" | "sequencediagram" => Self::Sequence,
            "class" | "classdiagram" => Self::Class,
            "gantt" => Self::Gantt,
            _ => Self::Other,
        }
    }

    /// Kind implied by the Mermaid header of `source`
    ///
    /// Returns `None` when the first meaningful line is not a known header,
    /// which is also how unparseable sources are detected.
    #[must_use]
    pub fn from_source(source: &str) -> Option<Self> {
        let header = source
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty() && !line.starts_with("%%"))?;
        let keyword = header.split_whitespace().next()?;
        MERMAID_HEADERS
            .iter()
            .find(|(name, _)| keyword == *name || keyword.strip_suffix(';') == Some(*name))
            .map(|(_, kind)| *kind)
    }
}

impl Display for DiagramKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a diagram has no rendered image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderFailure {
    /// Source was empty
    EmptySource,
    /// Source is not recognizable Mermaid
    InvalidSyntax,
    /// Renderer could not be reached or refused the request
    Unavailable,
    /// Renderer did not answer in time
    Timeout,
}

impl Display for RenderFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::EmptySource => "empty diagram source",
            Self::InvalidSyntax => "invalid diagram syntax",
            Self::Unavailable => "renderer unavailable",
            Self::Timeout => "render timed out",
        };
        f.write_str(text)
    }
}

/// Render state of a diagram
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RenderStatus {
    /// Not yet submitted
    #[default]
    Pending,
    /// Rendered to an image
    Rendered(ImageHandle),
    /// Rendering failed or was never possible
    Failed(RenderFailure),
}

/// A titled Mermaid diagram
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagram {
    /// Diagram title
    pub title: String,
    /// Diagram type
    pub kind: DiagramKind,
    /// Mermaid source text
    pub source: String,
    /// Render state
    pub status: RenderStatus,
}

impl Diagram {
    /// Title used when none is given
    pub const UNTITLED: &'static str = "Untitled Diagram";

    /// Create a diagram, marking it failed when the source is empty or unrecognized
    #[must_use]
    pub fn new(title: impl Into<String>, kind: DiagramKind, source: impl Into<String>) -> Self {
        let source = source.into();
        let status = match check_source(&source) {
            Ok(()) => RenderStatus::Pending,
            Err(failure) => RenderStatus::Failed(failure),
        };
        Self {
            title: title.into(),
            kind,
            source,
            status,
        }
    }

    /// Rendered image, if any
    #[inline]
    #[must_use]
    pub fn rendered(&self) -> Option<&ImageHandle> {
        match &self.status {
            RenderStatus::Rendered(handle) => Some(handle),
            _ => None,
        }
    }

    /// Whether the diagram still awaits rendering
    #[inline]
    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self.status, RenderStatus::Pending)
    }
}

/// Validate a Mermaid source well enough to decide whether it is worth rendering
///
/// # Errors
/// Returns the failure the diagram should be marked with
pub fn check_source(source: &str) -> Result<(), RenderFailure> {
    if source.trim().is_empty() {
        return Err(RenderFailure::EmptySource);
    }
    DiagramKind::from_source(source)
        .map(|_| ())
        .ok_or(RenderFailure::InvalidSyntax)
}
