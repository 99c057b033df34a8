//! External collaborator boundaries
//!
//! The coordinator only sees these traits. HTTP-backed implementations live
//! in [`crate::http`]; tests substitute fakes.

use crate::error::{DiagramError, ProviderError};
use async_trait::async_trait;
use prd_schema::{DiagramKind, ImageHandle};
use serde::{Deserialize, Serialize};

/// Renders Mermaid source to an image
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DiagramRenderer: Send + Sync {
    /// Render one diagram
    ///
    /// # Errors
    /// Returns [`DiagramError`] when the service is unreachable, rejects the
    /// source, or times out
    async fn render(&self, source: &str, kind: DiagramKind) -> Result<ImageHandle, DiagramError>;
}

/// Finds images for a free-text description
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageProvider: Send + Sync {
    /// Images ranked by relevance, possibly none
    ///
    /// # Errors
    /// Returns [`ProviderError`] when the provider cannot be queried
    async fn search(&self, query: &str) -> Result<Vec<ImageHandle>, ProviderError>;
}

/// One web-search result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Page title
    pub title: String,
    /// Page URL
    pub url: String,
}

impl SearchHit {
    /// Create a hit
    #[inline]
    #[must_use]
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
        }
    }

    /// Reference item text, `Title - URL`
    #[must_use]
    pub fn citation(&self) -> String {
        let title = self.title.trim();
        if title.is_empty() {
            self.url.clone()
        } else {
            format!("{title} - {}", self.url)
        }
    }
}

/// Web search
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Results in relevance order
    ///
    /// # Errors
    /// Returns [`ProviderError`] when the provider cannot be queried
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, ProviderError>;
}
