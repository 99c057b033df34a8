//! PRD Normalize - raw model output to canonical documents
//!
//! Model responses are untrusted: they may wrap JSON in prose, include
//! `<think>` reasoning blocks, or use loosely-shaped values. The
//! [`Normalizer`] recovers the JSON object and coerces every recognized
//! section into [`prd_schema::SectionContent`]. Coercion never fails on
//! valid JSON.
//!
//! # Example
//!
//! ```rust
//! use prd_normalize::Normalizer;
//! use prd_schema::SectionName;
//!
//! let doc = Normalizer::new()
//!     .normalize(r#"Here is your PRD: {"Executive Summary": "X"} Thanks!"#)
//!     .unwrap();
//! assert!(!doc.section(SectionName::ExecutiveSummary).unwrap().is_blank());
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod coerce;
mod error;
mod extract;
mod normalizer;
mod sink;

pub use error::{ErrorKind, NormalizationError, SinkError, UnparseableCause};
pub use normalizer::Normalizer;
pub use sink::{DiagnosticSink, FsDiagnosticSink, MemoryDiagnosticSink, NullSink};
