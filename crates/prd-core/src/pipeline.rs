//! The generation pipeline
//!
//! ```text
//! description ─► LanguageModel ─► Normalizer ─► EnrichmentCoordinator ─► Assembler ─► Renderer
//! ```
//!
//! Only the model call and normalization can fail a run. Everything after a
//! successful parse degrades per item instead of failing.

use crate::config::GeneratorConfig;
use crate::error::{ConfigError, LlmError, PipelineError};
use crate::llm::{LanguageModel, OllamaClient};
use crate::prompt::build_prompt;
use prd_assemble::{Assembler, AssemblyOptions, Block};
use prd_enrich::http::{GooglePseSearch, MermaidServiceClient, PixabayImageProvider};
use prd_enrich::{CancelSignal, EnrichmentCoordinator, EnrichmentReport};
use prd_normalize::{DiagnosticSink, FsDiagnosticSink, Normalizer};
use prd_render::{FooterMetadata, PaginatedTextRenderer, RenderedArtifact, Renderer};
use prd_schema::{ContentHash, Document};
use std::sync::Arc;
use tracing::Instrument;
use ulid::Ulid;

/// Everything one run produced
#[derive(Debug, Clone)]
pub struct GenerationOutput {
    /// Run identifier, also attached to every log line of the run
    pub run_id: Ulid,
    /// Fingerprint of the normalized document, before enrichment
    pub fingerprint: ContentHash,
    /// Enriched document
    pub document: Document,
    /// Enrichment outcome
    pub report: EnrichmentReport,
    /// Assembled blocks
    pub blocks: Vec<Block>,
    /// Rendered pages
    pub artifact: RenderedArtifact,
}

/// Drives a description or raw model output through every stage
#[derive(Clone)]
pub struct PrdGenerator {
    config: GeneratorConfig,
    model: Arc<dyn LanguageModel>,
    normalizer: Normalizer,
    coordinator: EnrichmentCoordinator,
    assembler: Assembler,
    renderer: Arc<dyn Renderer>,
}

impl PrdGenerator {
    /// Generator with the given model and no enrichment collaborators
    ///
    /// # Errors
    /// Returns [`PipelineError::Config`] if `config` fails validation
    pub fn new(config: GeneratorConfig, model: Arc<dyn LanguageModel>) -> Result<Self, PipelineError> {
        config.validate()?;
        let normalizer = Normalizer::new().with_strip_thinking(config.normalizer.strip_thinking);
        let coordinator = EnrichmentCoordinator::new(config.enrichment.clone());
        let assembler = Assembler::with_options(AssemblyOptions {
            title: Some(config.output.document_title.clone()).filter(|t| !t.trim().is_empty()),
            page_breaks: config.output.page_breaks,
        });
        let renderer = PaginatedTextRenderer::new(config.output.page_width, config.output.page_height)?;

        Ok(Self {
            config,
            model,
            normalizer,
            coordinator,
            assembler,
            renderer: Arc::new(renderer),
        })
    }

    /// Generator wired to Ollama and the HTTP collaborators in `config`
    ///
    /// Image lookup needs a Pixabay key and reference search needs Google
    /// credentials; without them those stages are skipped. Diagnostics go to
    /// the configured debug directory.
    ///
    /// # Errors
    /// Returns [`PipelineError::Config`] if `config` is invalid or a client
    /// cannot be built
    pub fn from_config(config: GeneratorConfig) -> Result<Self, PipelineError> {
        let model = OllamaClient::new(&config.llm).map_err(ConfigError::from)?;
        let timeout = config.enrichment.call_timeout();
        let services = &config.services;

        let mut coordinator = EnrichmentCoordinator::new(config.enrichment.clone()).with_diagram_renderer(
            Arc::new(
                MermaidServiceClient::new(&services.mermaid_url, &config.output.asset_dir, timeout)
                    .map_err(ConfigError::from)?,
            ),
        );
        match &services.pixabay_api_key {
            Some(key) => {
                let provider = PixabayImageProvider::new(key, timeout).map_err(ConfigError::from)?;
                coordinator = coordinator.with_image_provider(Arc::new(provider));
            }
            None => tracing::info!("no Pixabay API key configured, image lookup skipped"),
        }
        match (&services.google_pse_api_key, &services.google_pse_cx) {
            (Some(key), Some(cx)) => {
                let search = GooglePseSearch::new(
                    key,
                    cx,
                    config.enrichment.max_results_per_term,
                    timeout,
                )
                .map_err(ConfigError::from)?;
                coordinator = coordinator.with_search_provider(Arc::new(search));
            }
            _ => tracing::info!("no Google search credentials configured, reference search skipped"),
        }

        let sink = Arc::new(FsDiagnosticSink::new(&config.output.debug_dir));
        Ok(Self::new(config, Arc::new(model))?
            .with_sink(sink)
            .with_coordinator(coordinator))
    }

    /// With a diagnostic sink for raw responses and parsed snapshots
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.normalizer = self.normalizer.with_sink(sink);
        self
    }

    /// With a custom enrichment coordinator
    #[must_use]
    pub fn with_coordinator(mut self, coordinator: EnrichmentCoordinator) -> Self {
        self.coordinator = coordinator;
        self
    }

    /// With a custom renderer
    #[must_use]
    pub fn with_renderer(mut self, renderer: Arc<dyn Renderer>) -> Self {
        self.renderer = renderer;
        self
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Enrichment coordinator
    #[inline]
    #[must_use]
    pub fn coordinator(&self) -> &EnrichmentCoordinator {
        &self.coordinator
    }

    /// Generate a PRD from a product description
    ///
    /// # Errors
    /// Returns [`PipelineError::Cancelled`] if `cancel` fires before the
    /// model answers, [`PipelineError::Generation`] if the model is not
    /// ready or fails, and
    /// otherwise the errors of [`Self::generate_from_raw`]
    pub async fn generate(
        &self,
        description: &str,
        cancel: &CancelSignal,
    ) -> Result<GenerationOutput, PipelineError> {
        let run_id = Ulid::new();
        async {
            if cancel.is_cancelled() {
                return Err(PipelineError::Cancelled);
            }
            let prompt = build_prompt(description);
            tracing::info!(description_chars = description.len(), "generating PRD content");

            let raw = tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    tracing::warn!("cancelled while waiting for the language model");
                    return Err(PipelineError::Cancelled);
                }
                result = self.call_model(&prompt) => result.inspect_err(|e| {
                    tracing::error!(error = %e, "language model call failed");
                })?,
            };
            self.process(run_id, &raw, cancel).await
        }
        .instrument(tracing::info_span!("generate", %run_id))
        .await
    }

    /// Run everything after the model call on pre-generated raw content
    ///
    /// # Errors
    /// Returns [`PipelineError::Normalization`] if `raw` holds no usable JSON
    /// object; the error points at the saved raw text when a sink stored it
    pub async fn generate_from_raw(
        &self,
        raw: &str,
        cancel: &CancelSignal,
    ) -> Result<GenerationOutput, PipelineError> {
        let run_id = Ulid::new();
        self.process(run_id, raw, cancel)
            .instrument(tracing::info_span!("generate_from_raw", %run_id))
            .await
    }

    async fn call_model(&self, prompt: &str) -> Result<String, LlmError> {
        self.model.ensure_ready().await?;
        self.model.generate(prompt).await
    }

    async fn process(
        &self,
        run_id: Ulid,
        raw: &str,
        cancel: &CancelSignal,
    ) -> Result<GenerationOutput, PipelineError> {
        let mut document = self.normalizer.normalize(raw)?;
        let fingerprint = document.fingerprint();
        tracing::debug!(fingerprint = %fingerprint.short(), "content normalized");
        let report = self.coordinator.enrich(&mut document, cancel).await;
        let blocks = self.assembler.assemble(&document)?;

        let footer = FooterMetadata::now().with_attribution(self.config.output.attribution.clone());
        let artifact = self.renderer.render(&blocks, &footer)?;

        tracing::info!(
            blocks = blocks.len(),
            pages = artifact.page_count(),
            failures = report.failures.len(),
            cancelled = report.cancelled,
            "PRD generated"
        );
        Ok(GenerationOutput {
            run_id,
            fingerprint,
            document,
            report,
            blocks,
            artifact,
        })
    }
}

impl std::fmt::Debug for PrdGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrdGenerator")
            .field("config", &self.config)
            .field("normalizer", &self.normalizer)
            .field("coordinator", &self.coordinator)
            .field("assembler", &self.assembler)
            .finish_non_exhaustive()
    }
}
