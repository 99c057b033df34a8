//! Enrichment configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Which enrichments run, and how hard collaborators may be driven
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrichmentConfig {
    /// Render Architecture diagrams
    pub diagrams: bool,
    /// Fetch images for image suggestions
    pub images: bool,
    /// Search the web for reference search terms
    pub references: bool,
    /// Calls in flight at once
    pub max_concurrency: usize,
    /// Per-call timeout in seconds
    pub call_timeout_secs: u64,
    /// Search hits considered per term
    pub max_results_per_term: usize,
    /// Result cache time-to-live in seconds
    pub cache_ttl_secs: u64,
    /// Result cache capacity
    pub cache_capacity: u64,
}

impl EnrichmentConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every enrichment disabled
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            diagrams: false,
            images: false,
            references: false,
            ..Self::default()
        }
    }

    /// With diagram rendering toggled
    #[inline]
    #[must_use]
    pub fn with_diagrams(mut self, enabled: bool) -> Self {
        self.diagrams = enabled;
        self
    }

    /// With image lookup toggled
    #[inline]
    #[must_use]
    pub fn with_images(mut self, enabled: bool) -> Self {
        self.images = enabled;
        self
    }

    /// With reference search toggled
    #[inline]
    #[must_use]
    pub fn with_references(mut self, enabled: bool) -> Self {
        self.references = enabled;
        self
    }

    /// With concurrency limit
    #[inline]
    #[must_use]
    pub fn with_max_concurrency(mut self, max: usize) -> Self {
        self.max_concurrency = max;
        self
    }

    /// Per-call timeout
    #[inline]
    #[must_use]
    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs)
    }

    /// Cache time-to-live
    #[inline]
    #[must_use]
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Whether any enrichment is enabled
    #[inline]
    #[must_use]
    pub fn any_enabled(&self) -> bool {
        self.diagrams || self.images || self.references
    }
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            diagrams: true,
            images: true,
            references: true,
            max_concurrency: 4,
            call_timeout_secs: 30,
            max_results_per_term: 5,
            cache_ttl_secs: 86_400,
            cache_capacity: 1_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = EnrichmentConfig::default();
        assert!(config.any_enabled());
        assert_eq!(config.max_concurrency, 4);
        assert_eq!(config.call_timeout(), Duration::from_secs(30));
        assert_eq!(config.max_results_per_term, 5);
    }

    #[test]
    fn disabled_turns_everything_off() {
        let config = EnrichmentConfig::disabled();
        assert!(!config.any_enabled());
        assert!(config.with_images(true).any_enabled());
    }

    #[test]
    fn partial_deserialization_keeps_defaults() {
        let config: EnrichmentConfig =
            serde_json::from_str(r#"{"images": false, "max_concurrency": 2}"#).unwrap();
        assert!(!config.images);
        assert!(config.diagrams);
        assert_eq!(config.max_concurrency, 2);
    }
}
