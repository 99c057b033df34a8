//! Google Programmable Search Engine client

use super::client_with_timeout;
use crate::collaborator::{SearchHit, SearchProvider};
use crate::error::ProviderError;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

/// Custom search endpoint
pub const GOOGLE_PSE_ENDPOINT: &str = "https://www.googleapis.com/customsearch/v1";

/// The API returns at most this many results per request
const MAX_NUM: usize = 10;

/// Search hits from a Custom Search response
///
/// A response without `items` means no results. Items lacking a link are
/// skipped.
#[must_use]
pub fn parse_pse_response(body: &Value) -> Vec<SearchHit> {
    body.get("items")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| {
                    let link = item.get("link").and_then(Value::as_str)?;
                    let title = item.get("title").and_then(Value::as_str).unwrap_or_default();
                    Some(SearchHit::new(title.trim(), link.trim()))
                })
                .filter(|hit| !hit.url.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

/// Search provider backed by Google Custom Search
#[derive(Clone)]
pub struct GooglePseSearch {
    client: Client,
    api_key: String,
    cx: String,
    max_results: usize,
    endpoint: String,
}

impl GooglePseSearch {
    /// Create a provider returning up to `max_results` hits per query
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built
    pub fn new(
        api_key: impl Into<String>,
        cx: impl Into<String>,
        max_results: usize,
        timeout: Duration,
    ) -> reqwest::Result<Self> {
        Ok(Self {
            client: client_with_timeout(timeout)?,
            api_key: api_key.into(),
            cx: cx.into(),
            max_results: max_results.clamp(1, MAX_NUM),
            endpoint: GOOGLE_PSE_ENDPOINT.to_string(),
        })
    }

    /// With a different endpoint
    #[inline]
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Results requested per query
    #[inline]
    #[must_use]
    pub fn max_results(&self) -> usize {
        self.max_results
    }
}

impl std::fmt::Debug for GooglePseSearch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GooglePseSearch")
            .field("cx", &self.cx)
            .field("max_results", &self.max_results)
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl SearchProvider for GooglePseSearch {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, ProviderError> {
        let num = self.max_results.to_string();
        tracing::debug!(query, num = self.max_results, "searching google pse");

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("q", query),
                ("cx", self.cx.as_str()),
                ("key", self.api_key.as_str()),
                ("num", num.as_str()),
            ])
            .send()
            .await
            .map_err(|e| ProviderError::from_reqwest(&e))?
            .error_for_status()
            .map_err(|e| ProviderError::from_reqwest(&e))?;

        let body: Value = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;
        Ok(parse_pse_response(&body))
    }
}
