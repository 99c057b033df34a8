//! Enrichment fan-out and merge
//!
//! Every diagram, image suggestion and search term becomes one independent
//! call through the [`WorkerPool`]. Calls return outcomes keyed by the item
//! they were issued for, and the outcomes are written back into the
//! document only after the whole fan-out has settled. A failed, timed-out or
//! cancelled call leaves its item as it was.

use crate::cache::{CacheKey, EnrichmentCache};
use crate::cancel::CancelSignal;
use crate::collaborator::{DiagramRenderer, ImageProvider, SearchHit, SearchProvider};
use crate::config::EnrichmentConfig;
use crate::error::{DiagramError, FailureReason, TaskFailure};
use crate::pool::{PoolStats, WorkerPool};
use crate::references::merge_hits;
use futures::future::join_all;
use prd_schema::{
    DiagramKind, Document, ImageAsset, ImageHandle, RenderFailure, RenderStatus, SectionName,
};
use std::fmt::{self, Display, Formatter};
use std::sync::Arc;

/// What an enrichment call was for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnrichmentTarget {
    /// Architecture diagram at `index`
    Diagram { index: usize, title: String },
    /// Image suggestion at `index`
    Image { index: usize, description: String },
    /// Reference search term
    SearchTerm { term: String },
}

impl Display for EnrichmentTarget {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Diagram { index, title } => write!(f, "diagram #{index} '{title}'"),
            Self::Image { index, description } => write!(f, "image #{index} '{description}'"),
            Self::SearchTerm { term } => write!(f, "search term '{term}'"),
        }
    }
}

/// One item that could not be enriched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichmentFailure {
    /// Item concerned
    pub target: EnrichmentTarget,
    /// Why it failed
    pub reason: FailureReason,
}

/// Outcome counts of one enrichment pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrichmentReport {
    /// Diagrams now carrying an image
    pub diagrams_rendered: usize,
    /// Diagrams marked render-failed in this pass
    pub diagrams_failed: usize,
    /// Suggestions now carrying an image
    pub images_resolved: usize,
    /// Suggestions that stayed textual
    pub images_missed: usize,
    /// Reference items appended
    pub references_added: usize,
    /// Calls abandoned because the run was cancelled
    pub interrupted: usize,
    /// Whether the run was cancelled
    pub cancelled: bool,
    /// Per-item failures
    pub failures: Vec<EnrichmentFailure>,
}

impl EnrichmentReport {
    /// No failures and no cancellation
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && !self.cancelled
    }

    fn record(&mut self, target: EnrichmentTarget, reason: FailureReason) {
        tracing::warn!(target = %target, reason = %reason, "enrichment failed");
        self.failures.push(EnrichmentFailure { target, reason });
    }
}

/// Fans enrichment calls out to collaborators and merges results back
#[derive(Clone)]
pub struct EnrichmentCoordinator {
    config: EnrichmentConfig,
    diagram_renderer: Option<Arc<dyn DiagramRenderer>>,
    image_provider: Option<Arc<dyn ImageProvider>>,
    search_provider: Option<Arc<dyn SearchProvider>>,
    pool: Arc<WorkerPool>,
    diagram_cache: EnrichmentCache<ImageHandle>,
    image_cache: EnrichmentCache<Vec<ImageHandle>>,
    search_cache: EnrichmentCache<Vec<SearchHit>>,
}

impl EnrichmentCoordinator {
    /// Create a coordinator with no collaborators attached
    #[must_use]
    pub fn new(config: EnrichmentConfig) -> Self {
        let pool = WorkerPool::new(config.max_concurrency, config.call_timeout());
        let (capacity, ttl) = (config.cache_capacity, config.cache_ttl());
        Self {
            config,
            diagram_renderer: None,
            image_provider: None,
            search_provider: None,
            pool: Arc::new(pool),
            diagram_cache: EnrichmentCache::new(capacity, ttl),
            image_cache: EnrichmentCache::new(capacity, ttl),
            search_cache: EnrichmentCache::new(capacity, ttl),
        }
    }

    /// With a diagram renderer
    #[inline]
    #[must_use]
    pub fn with_diagram_renderer(mut self, renderer: Arc<dyn DiagramRenderer>) -> Self {
        self.diagram_renderer = Some(renderer);
        self
    }

    /// With an image provider
    #[inline]
    #[must_use]
    pub fn with_image_provider(mut self, provider: Arc<dyn ImageProvider>) -> Self {
        self.image_provider = Some(provider);
        self
    }

    /// With a search provider
    #[inline]
    #[must_use]
    pub fn with_search_provider(mut self, provider: Arc<dyn SearchProvider>) -> Self {
        self.search_provider = Some(provider);
        self
    }

    /// With a custom worker pool
    #[inline]
    #[must_use]
    pub fn with_pool(mut self, pool: WorkerPool) -> Self {
        self.pool = Arc::new(pool);
        self
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &EnrichmentConfig {
        &self.config
    }

    /// Worker pool statistics
    #[must_use]
    pub fn pool_stats(&self) -> PoolStats {
        self.pool.stats()
    }

    /// Enrich `document` in place
    ///
    /// Never fails: per-item problems are reported in the returned
    /// [`EnrichmentReport`] and leave the item textual.
    #[tracing::instrument(skip_all)]
    pub async fn enrich(&self, document: &mut Document, cancel: &CancelSignal) -> EnrichmentReport {
        let renderer = self
            .diagram_renderer
            .as_deref()
            .filter(|_| self.config.diagrams);
        let images = self.image_provider.as_deref().filter(|_| self.config.images);
        let search = self
            .search_provider
            .as_deref()
            .filter(|_| self.config.references);

        let diagram_jobs = renderer.map(|_| collect_diagram_jobs(document)).unwrap_or_default();
        let image_jobs = images.map(|_| collect_image_jobs(document)).unwrap_or_default();
        let search_jobs = search.map(|_| collect_search_terms(document)).unwrap_or_default();
        tracing::debug!(
            diagrams = diagram_jobs.len(),
            images = image_jobs.len(),
            terms = search_jobs.len(),
            diagrams_enabled = renderer.is_some(),
            images_enabled = images.is_some(),
            references_enabled = search.is_some(),
            "starting enrichment"
        );

        let (diagram_results, image_results, search_results) = tokio::join!(
            join_all(diagram_jobs.iter().filter_map(|job| {
                renderer.map(|r| self.render_diagram(r, job.kind, &job.source, cancel))
            })),
            join_all(image_jobs.iter().filter_map(|job| {
                images.map(|p| self.find_image(p, &job.description, cancel))
            })),
            join_all(search_jobs.iter().filter_map(|term| {
                search.map(|p| self.search_term(p, term, cancel))
            })),
        );

        let mut report = EnrichmentReport::default();
        apply_diagrams(document, &diagram_jobs, diagram_results, &mut report);
        apply_images(document, &image_jobs, image_results, &mut report);
        self.apply_references(document, &search_jobs, search_results, &mut report);
        report.cancelled = cancel.is_cancelled();

        tracing::info!(
            diagrams_rendered = report.diagrams_rendered,
            diagrams_failed = report.diagrams_failed,
            images_resolved = report.images_resolved,
            images_missed = report.images_missed,
            references_added = report.references_added,
            interrupted = report.interrupted,
            cancelled = report.cancelled,
            "enrichment finished"
        );
        report
    }

    async fn render_diagram(
        &self,
        renderer: &dyn DiagramRenderer,
        kind: DiagramKind,
        source: &str,
        cancel: &CancelSignal,
    ) -> Result<ImageHandle, FailureReason> {
        self.diagram_cache
            .try_get_or_insert_with(CacheKey::diagram(kind, source), || async {
                Ok::<_, FailureReason>(self.pool.run(cancel, renderer.render(source, kind)).await??)
            })
            .await
    }

    async fn find_image(
        &self,
        provider: &dyn ImageProvider,
        description: &str,
        cancel: &CancelSignal,
    ) -> Result<Option<ImageHandle>, FailureReason> {
        let found = self
            .image_cache
            .try_get_or_insert_with(CacheKey::images(description), || async {
                Ok::<_, FailureReason>(self.pool.run(cancel, provider.search(description)).await??)
            })
            .await?;
        Ok(found.into_iter().next())
    }

    async fn search_term(
        &self,
        provider: &dyn SearchProvider,
        term: &str,
        cancel: &CancelSignal,
    ) -> Result<Vec<SearchHit>, FailureReason> {
        self.search_cache
            .try_get_or_insert_with(CacheKey::search(term), || async {
                Ok::<_, FailureReason>(self.pool.run(cancel, provider.search(term)).await??)
            })
            .await
    }

    fn apply_references(
        &self,
        document: &mut Document,
        terms: &[String],
        results: Vec<Result<Vec<SearchHit>, FailureReason>>,
        report: &mut EnrichmentReport,
    ) {
        let mut hits_per_term = Vec::with_capacity(results.len());
        for (term, result) in terms.iter().zip(results) {
            match result {
                Ok(hits) => hits_per_term.push(hits),
                Err(FailureReason::Task(TaskFailure::Cancelled)) => report.interrupted += 1,
                Err(reason) => {
                    report.record(EnrichmentTarget::SearchTerm { term: term.clone() }, reason);
                }
            }
        }
        if let Some(section) = document.section_mut(SectionName::References) {
            report.references_added = merge_hits(
                &mut section.content,
                &hits_per_term,
                self.config.max_results_per_term,
            );
        }
    }
}

impl std::fmt::Debug for EnrichmentCoordinator {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnrichmentCoordinator")
            .field("config", &self.config)
            .field("diagram_renderer", &self.diagram_renderer.is_some())
            .field("image_provider", &self.image_provider.is_some())
            .field("search_provider", &self.search_provider.is_some())
            .field("pool", &self.pool)
            .finish_non_exhaustive()
    }
}

struct DiagramJob {
    index: usize,
    title: String,
    kind: DiagramKind,
    source: String,
}

struct ImageJob {
    index: usize,
    description: String,
}

fn collect_diagram_jobs(document: &Document) -> Vec<DiagramJob> {
    document
        .section(SectionName::Architecture)
        .map(|section| {
            section
                .diagrams
                .iter()
                .enumerate()
                .filter(|(_, diagram)| diagram.is_pending())
                .map(|(index, diagram)| DiagramJob {
                    index,
                    title: diagram.title.clone(),
                    kind: diagram.kind,
                    source: diagram.source.clone(),
                })
                .collect()
        })
        .unwrap_or_default()
}

fn collect_image_jobs(document: &Document) -> Vec<ImageJob> {
    document
        .image_suggestions
        .iter()
        .enumerate()
        .filter(|(_, s)| s.image.is_none() && !s.description.trim().is_empty())
        .map(|(index, s)| ImageJob {
            index,
            description: s.description.clone(),
        })
        .collect()
}

fn collect_search_terms(document: &Document) -> Vec<String> {
    document
        .section(SectionName::References)
        .map(|section| section.search_terms.clone())
        .unwrap_or_default()
}

fn render_failure(reason: &FailureReason) -> RenderFailure {
    match reason {
        FailureReason::Diagram(DiagramError::InvalidSyntax(_)) => RenderFailure::InvalidSyntax,
        FailureReason::Diagram(DiagramError::Timeout)
        | FailureReason::Task(TaskFailure::Timeout { .. }) => RenderFailure::Timeout,
        _ => RenderFailure::Unavailable,
    }
}

fn apply_diagrams(
    document: &mut Document,
    jobs: &[DiagramJob],
    results: Vec<Result<ImageHandle, FailureReason>>,
    report: &mut EnrichmentReport,
) {
    let Some(section) = document.section_mut(SectionName::Architecture) else {
        return;
    };
    for (job, result) in jobs.iter().zip(results) {
        let Some(diagram) = section.diagrams.get_mut(job.index) else {
            continue;
        };
        match result {
            Ok(handle) => {
                diagram.status = RenderStatus::Rendered(handle);
                report.diagrams_rendered += 1;
            }
            Err(FailureReason::Task(TaskFailure::Cancelled)) => report.interrupted += 1,
            Err(reason) => {
                diagram.status = RenderStatus::Failed(render_failure(&reason));
                report.diagrams_failed += 1;
                report.record(
                    EnrichmentTarget::Diagram {
                        index: job.index,
                        title: job.title.clone(),
                    },
                    reason,
                );
            }
        }
    }
}

fn apply_images(
    document: &mut Document,
    jobs: &[ImageJob],
    results: Vec<Result<Option<ImageHandle>, FailureReason>>,
    report: &mut EnrichmentReport,
) {
    for (job, result) in jobs.iter().zip(results) {
        let Some(suggestion) = document.image_suggestions.get_mut(job.index) else {
            continue;
        };
        match result {
            Ok(Some(handle)) => {
                let owner = suggestion.placement();
                suggestion.image = Some(ImageAsset { handle, owner });
                report.images_resolved += 1;
            }
            Ok(None) => report.images_missed += 1,
            Err(FailureReason::Task(TaskFailure::Cancelled)) => report.interrupted += 1,
            Err(reason) => {
                report.images_missed += 1;
                report.record(
                    EnrichmentTarget::Image {
                        index: job.index,
                        description: job.description.clone(),
                    },
                    reason,
                );
            }
        }
    }
}
