//! PRD Core
//!
//! The generation pipeline: a product description goes to a language model,
//! the response is normalized into a [`Document`](prd_schema::Document),
//! enriched, assembled into blocks and rendered into pages.
//!
//! # Core Concepts
//!
//! - [`PrdGenerator`]: drives one run end to end
//! - [`GeneratorConfig`]: TOML file plus environment overrides
//! - [`LanguageModel`]: model seam, with [`OllamaClient`] as the HTTP adapter
//! - [`PipelineError`]: the only failures that abort a run
//!
//! # Example
//!
//! ```rust,ignore
//! use prd_core::{GeneratorConfig, PrdGenerator};
//! use prd_enrich::CancelHandle;
//!
//! # async fn example() -> Result<(), prd_core::PipelineError> {
//! let config = GeneratorConfig::load("prd.toml".as_ref())?.with_env_overrides();
//! let generator = PrdGenerator::from_config(config)?;
//! let cancel = CancelHandle::new();
//! let output = generator.generate("A carbon footprint tracker", &cancel.signal()).await?;
//! output.artifact.write_to("prd.txt".as_ref())?;
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod config;
mod error;
mod llm;
mod pipeline;
mod prompt;
mod telemetry;

pub use config::{
    parse_bool, GeneratorConfig, LlmConfig, NormalizerConfig, OutputConfig, ServicesConfig,
};
pub use error::{ConfigError, LlmError, PipelineError};
pub use llm::{parse_generate_response, parse_model_tags, LanguageModel, OllamaClient};
pub use pipeline::{GenerationOutput, PrdGenerator};
pub use prompt::build_prompt;
pub use telemetry::{init_tracing, TelemetryFormat};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
