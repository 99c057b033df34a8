//! PRD Rendering
//!
//! The [`Renderer`] seam turns an assembled block sequence into a paginated
//! artifact with a footer on every page. [`PaginatedTextRenderer`] is the
//! built-in implementation: fixed-size plain-text pages, fully
//! deterministic for a given input.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod artifact;
mod error;
mod renderer;
pub mod text;

pub use artifact::{FooterMetadata, RenderedArtifact, DEFAULT_ATTRIBUTION, TIMESTAMP_FORMAT};
pub use error::RenderError;
pub use renderer::{PaginatedTextRenderer, Renderer, MIN_HEIGHT, MIN_WIDTH};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
