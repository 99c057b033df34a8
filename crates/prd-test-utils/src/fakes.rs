//! Scripted collaborator fakes
//!
//! Every fake counts its calls so tests can assert on fan-out and caching.

use async_trait::async_trait;
use parking_lot::Mutex;
use prd_core::{LanguageModel, LlmError};
use prd_enrich::{
    DiagramError, DiagramRenderer, ImageProvider, ProviderError, SearchHit, SearchProvider,
};
use prd_schema::{ContentHash, DiagramKind, ImageHandle};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Renders every diagram to a URL derived from its source
#[derive(Debug, Default)]
pub struct StaticDiagramRenderer {
    calls: AtomicUsize,
}

impl StaticDiagramRenderer {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// URL this renderer returns for `source`
    pub fn url_for(source: &str) -> ImageHandle {
        let hash = ContentHash::compute_parts(&[source]);
        ImageHandle::Url(format!("https://diagrams.test/{}.png", hash.short()))
    }
}

#[async_trait]
impl DiagramRenderer for StaticDiagramRenderer {
    async fn render(&self, source: &str, _kind: DiagramKind) -> Result<ImageHandle, DiagramError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Self::url_for(source))
    }
}

/// Fails every render with a fixed error
#[derive(Debug)]
pub struct FailingDiagramRenderer {
    error: DiagramError,
    calls: AtomicUsize,
}

impl FailingDiagramRenderer {
    pub fn new(error: DiagramError) -> Arc<Self> {
        Arc::new(Self {
            error,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn unavailable() -> Arc<Self> {
        Self::new(DiagramError::Unavailable("connection refused".into()))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DiagramRenderer for FailingDiagramRenderer {
    async fn render(&self, _source: &str, _kind: DiagramKind) -> Result<ImageHandle, DiagramError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(self.error.clone())
    }
}

/// Returns the same ranked images for every query
#[derive(Debug, Default)]
pub struct StaticImageProvider {
    images: Vec<ImageHandle>,
    queries: Mutex<Vec<String>>,
}

impl StaticImageProvider {
    pub fn new(urls: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            images: urls.iter().map(|u| ImageHandle::Url((*u).to_string())).collect(),
            queries: Mutex::new(Vec::new()),
        })
    }

    /// Provider that never finds anything
    pub fn empty() -> Arc<Self> {
        Self::new(&[])
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().clone()
    }
}

#[async_trait]
impl ImageProvider for StaticImageProvider {
    async fn search(&self, query: &str) -> Result<Vec<ImageHandle>, ProviderError> {
        self.queries.lock().push(query.to_string());
        Ok(self.images.clone())
    }
}

/// Fails every image query
#[derive(Debug, Default)]
pub struct FailingImageProvider;

#[async_trait]
impl ImageProvider for FailingImageProvider {
    async fn search(&self, _query: &str) -> Result<Vec<ImageHandle>, ProviderError> {
        Err(ProviderError::Request("connection reset".into()))
    }
}

/// Answers each known term with scripted hits, unknown terms with nothing
#[derive(Debug, Default)]
pub struct StaticSearch {
    hits: HashMap<String, Vec<SearchHit>>,
    queries: Mutex<Vec<String>>,
}

impl StaticSearch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the hits for one term
    #[must_use]
    pub fn with_hits(mut self, term: &str, hits: &[(&str, &str)]) -> Self {
        self.hits.insert(
            term.to_string(),
            hits.iter().map(|(t, u)| SearchHit::new(*t, *u)).collect(),
        );
        self
    }

    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().clone()
    }

    pub fn calls(&self) -> usize {
        self.queries.lock().len()
    }
}

#[async_trait]
impl SearchProvider for StaticSearch {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, ProviderError> {
        self.queries.lock().push(query.to_string());
        Ok(self.hits.get(query).cloned().unwrap_or_default())
    }
}

/// Fails every search
#[derive(Debug, Default)]
pub struct FailingSearch;

#[async_trait]
impl SearchProvider for FailingSearch {
    async fn search(&self, _query: &str) -> Result<Vec<SearchHit>, ProviderError> {
        Err(ProviderError::Status {
            status: 429,
            message: "rate limited".into(),
        })
    }
}

/// Wraps a collaborator and delays calls whose input contains `marker`
///
/// With no marker every call is delayed.
#[derive(Debug)]
pub struct Delayed<T> {
    inner: Arc<T>,
    delay: Duration,
    marker: Option<String>,
}

impl<T> Delayed<T> {
    pub fn all(inner: Arc<T>, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            inner,
            delay,
            marker: None,
        })
    }

    pub fn matching(inner: Arc<T>, delay: Duration, marker: &str) -> Arc<Self> {
        Arc::new(Self {
            inner,
            delay,
            marker: Some(marker.to_string()),
        })
    }

    async fn pause(&self, input: &str) {
        let hit = self.marker.as_deref().map_or(true, |m| input.contains(m));
        if hit {
            tokio::time::sleep(self.delay).await;
        }
    }
}

#[async_trait]
impl<T: DiagramRenderer> DiagramRenderer for Delayed<T> {
    async fn render(&self, source: &str, kind: DiagramKind) -> Result<ImageHandle, DiagramError> {
        self.pause(source).await;
        self.inner.render(source, kind).await
    }
}

#[async_trait]
impl<T: ImageProvider> ImageProvider for Delayed<T> {
    async fn search(&self, query: &str) -> Result<Vec<ImageHandle>, ProviderError> {
        self.pause(query).await;
        self.inner.search(query).await
    }
}

#[async_trait]
impl<T: SearchProvider> SearchProvider for Delayed<T> {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, ProviderError> {
        self.pause(query).await;
        self.inner.search(query).await
    }
}

/// Language model that replays scripted responses in order
///
/// Once the script runs out the last response repeats.
#[derive(Debug)]
pub struct ScriptedModel {
    responses: Vec<Result<String, LlmError>>,
    delay: Option<Duration>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedModel {
    pub fn replying(response: &str) -> Arc<Self> {
        Arc::new(Self {
            responses: vec![Ok(response.to_string())],
            delay: None,
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(error: LlmError) -> Arc<Self> {
        Arc::new(Self {
            responses: vec![Err(error)],
            delay: None,
            prompts: Mutex::new(Vec::new()),
        })
    }

    /// Model that answers only after `delay`
    pub fn slow(response: &str, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            responses: vec![Ok(response.to_string())],
            delay: Some(delay),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let index = {
            let mut prompts = self.prompts.lock();
            prompts.push(prompt.to_string());
            prompts.len() - 1
        };
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let last = self.responses.len().saturating_sub(1);
        self.responses
            .get(index.min(last))
            .cloned()
            .unwrap_or_else(|| Err(LlmError::EmptyResponse))
    }
}
