//! PRD Assembly
//!
//! Converts an enriched [`Document`](prd_schema::Document) into an ordered
//! sequence of [`Block`]s that a renderer can draw without further
//! interpretation.
//!
//! # Example
//!
//! ```rust
//! use prd_assemble::{assemble, Block};
//! use prd_schema::{Document, SectionContent, SectionName};
//!
//! let mut doc = Document::new();
//! if let Some(section) = doc.section_mut(SectionName::ExecutiveSummary) {
//!     section.content = SectionContent::Text("Track carbon footprint.".into());
//! }
//! let blocks = assemble(&doc).unwrap();
//! assert_eq!(blocks[0], Block::heading("Executive Summary", 2));
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod assembler;
mod block;
mod error;

pub use assembler::{assemble, Assembler, AssemblyOptions, EMPTY_DOCUMENT_TEXT};
pub use block::{Block, DiagramRendering, Figure};
pub use error::AssemblyError;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
