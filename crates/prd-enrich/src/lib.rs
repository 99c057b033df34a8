//! PRD Enrichment
//!
//! Resolves the parts of a [`Document`](prd_schema::Document) that need an
//! external service: Architecture diagrams are rendered to images, image
//! suggestions are matched to stock photos, and reference search terms are
//! turned into citations.
//!
//! # Core Concepts
//!
//! - [`EnrichmentCoordinator`]: fans calls out and merges outcomes back
//! - [`WorkerPool`]: bounded concurrency with a per-call timeout
//! - [`CancelHandle`] / [`CancelSignal`]: one upstream cancellation per run
//! - [`DiagramRenderer`], [`ImageProvider`], [`SearchProvider`]: collaborator seams
//! - [`EnrichmentCache`]: TTL cache of successful collaborator results
//!
//! Enrichment never fails as a whole. Each item either gains its asset or
//! stays textual, and the [`EnrichmentReport`] says which.
//!
//! # Example
//!
//! ```rust,ignore
//! use prd_enrich::{CancelHandle, EnrichmentConfig, EnrichmentCoordinator};
//!
//! # async fn example(mut doc: prd_schema::Document) {
//! let coordinator = EnrichmentCoordinator::new(EnrichmentConfig::default())
//!     .with_search_provider(search);
//! let cancel = CancelHandle::new();
//! let report = coordinator.enrich(&mut doc, &cancel.signal()).await;
//! println!("{} references added", report.references_added);
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod cache;
mod cancel;
mod collaborator;
mod config;
mod coordinator;
mod error;
pub mod http;
mod pool;
mod references;

pub use cache::{CacheKey, CacheStats, EnrichmentCache, DEFAULT_CAPACITY, DEFAULT_TTL};
pub use cancel::{CancelHandle, CancelSignal};
pub use collaborator::{DiagramRenderer, ImageProvider, SearchHit, SearchProvider};
pub use config::EnrichmentConfig;
pub use coordinator::{
    EnrichmentCoordinator, EnrichmentFailure, EnrichmentReport, EnrichmentTarget,
};
pub use error::{DiagramError, FailureReason, ProviderError, TaskFailure};
pub use pool::{PoolStats, WorkerPool};
pub use references::{merge_hits, normalize_url};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
