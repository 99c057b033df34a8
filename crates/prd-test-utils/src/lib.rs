//! Testing utilities for the PRD Forge workspace
//!
//! Scripted collaborators and raw model responses shared by the crate test
//! suites.

#![allow(missing_docs)]

pub mod fakes;
pub mod fixtures;

pub use fakes::{
    Delayed, FailingDiagramRenderer, FailingImageProvider, FailingSearch, ScriptedModel,
    StaticDiagramRenderer, StaticImageProvider, StaticSearch,
};
pub use fixtures::*;

use prd_enrich::EnrichmentConfig;
use prd_normalize::Normalizer;
use prd_schema::Document;

/// Normalize a fixture, panicking if it does not parse
pub fn normalized(raw: &str) -> Document {
    Normalizer::new().normalize(raw).unwrap()
}

/// Enrichment config with every stage on and a short call timeout
pub fn fast_enrichment_config() -> EnrichmentConfig {
    EnrichmentConfig {
        call_timeout_secs: 1,
        ..EnrichmentConfig::default()
    }
}
