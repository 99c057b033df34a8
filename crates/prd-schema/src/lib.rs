//! PRD Schema
//!
//! The canonical, strongly-typed model of a product requirement document.
//!
//! # Core Concepts
//!
//! - [`Document`]: twelve [`Section`]s in fixed order plus image suggestions
//! - [`SectionContent`]: a single text block or an ordered list of items
//! - [`Diagram`]: a Mermaid diagram with its [`RenderStatus`]
//! - [`ImageSuggestion`]: an image request, optionally resolved to an [`ImageAsset`]
//! - [`ContentHash`]: Blake3 fingerprint of the canonical JSON form
//!
//! # Example
//!
//! ```rust
//! use prd_schema::{Document, SectionContent, SectionName};
//!
//! let mut doc = Document::new();
//! if let Some(section) = doc.section_mut(SectionName::ExecutiveSummary) {
//!     section.content = SectionContent::Text("Track carbon footprint.".into());
//! }
//! assert_eq!(doc.to_canonical_json()["Executive Summary"], "Track carbon footprint.");
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod diagram;
mod document;
mod hash;
mod image;
mod section;
mod wire;

pub use diagram::{check_source, Diagram, DiagramKind, RenderFailure, RenderStatus};
pub use document::{Document, Reference, ShapeViolation};
pub use hash::ContentHash;
pub use image::{ImageAsset, ImageHandle, ImageSuggestion};
pub use section::{Section, SectionContent, SectionName};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
