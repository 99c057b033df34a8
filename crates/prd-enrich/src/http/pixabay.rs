//! Pixabay stock image search

use super::client_with_timeout;
use crate::collaborator::ImageProvider;
use crate::error::ProviderError;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use prd_schema::ImageHandle;
use regex::Regex;
use reqwest::Client;
use serde_json::Value;
use std::collections::HashSet;
use std::time::Duration;

/// Search endpoint
pub const PIXABAY_ENDPOINT: &str = "https://pixabay.com/api/";

const KEYWORD_LIMIT: usize = 3;
const PER_PAGE: &str = "3";

#[allow(clippy::expect_used)]
static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s]").expect("valid non-word pattern"));

const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "in", "on", "at", "with", "by", "for", "of", "to", "and", "or", "that",
    "this", "is", "are", "was", "were", "be", "been", "being", "have", "has", "had", "do",
    "does", "did", "but", "if", "then", "else", "when", "up", "down", "out", "about", "into",
    "over", "under",
];

/// Distinct lowercase keywords of a description, in order of appearance
///
/// Punctuation is dropped, as are stop words and words of two letters or fewer.
#[must_use]
pub fn extract_keywords(text: &str) -> Vec<String> {
    let cleaned = NON_WORD.replace_all(&text.to_lowercase(), " ").into_owned();
    let mut seen = HashSet::new();
    cleaned
        .split_whitespace()
        .filter(|word| word.chars().count() > 2 && !STOP_WORDS.contains(word))
        .filter(|word| seen.insert(*word))
        .map(str::to_string)
        .collect()
}

/// Image URLs from a Pixabay search response, best match first
///
/// # Errors
/// Returns [`ProviderError::InvalidResponse`] if `hits` is missing
pub fn parse_pixabay_response(body: &Value) -> Result<Vec<ImageHandle>, ProviderError> {
    let hits = body
        .get("hits")
        .and_then(Value::as_array)
        .ok_or_else(|| ProviderError::InvalidResponse("missing hits array".into()))?;

    Ok(hits
        .iter()
        .filter_map(|hit| {
            ["largeImageURL", "webformatURL"]
                .iter()
                .find_map(|field| hit.get(*field).and_then(Value::as_str))
                .filter(|url| !url.is_empty())
        })
        .map(|url| ImageHandle::Url(url.to_string()))
        .collect())
}

/// Image provider backed by the Pixabay API
#[derive(Clone)]
pub struct PixabayImageProvider {
    client: Client,
    api_key: String,
    endpoint: String,
}

impl PixabayImageProvider {
    /// Create a provider
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> reqwest::Result<Self> {
        Ok(Self {
            client: client_with_timeout(timeout)?,
            api_key: api_key.into(),
            endpoint: PIXABAY_ENDPOINT.to_string(),
        })
    }

    /// With a different endpoint
    #[inline]
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

impl std::fmt::Debug for PixabayImageProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixabayImageProvider")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ImageProvider for PixabayImageProvider {
    async fn search(&self, query: &str) -> Result<Vec<ImageHandle>, ProviderError> {
        let keywords = extract_keywords(query);
        if keywords.is_empty() {
            return Ok(Vec::new());
        }
        let q = keywords
            .iter()
            .take(KEYWORD_LIMIT)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ");
        tracing::debug!(query = %q, "searching pixabay");

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("key", self.api_key.as_str()),
                ("q", q.as_str()),
                ("image_type", "photo"),
                ("orientation", "horizontal"),
                ("per_page", PER_PAGE),
                ("safesearch", "true"),
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
        parse_pixabay_response(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn non_word_compiles() {
        Lazy::force(&NON_WORD);
    }

    #[test]
    fn keywords_skip_stop_words_and_short_words() {
        assert_eq!(
            extract_keywords("A dashboard showing the carbon footprint of a user, by month!"),
            vec!["dashboard", "showing", "carbon", "footprint", "user", "month"]
        );
    }

    #[test]
    fn keywords_are_unique_in_order() {
        assert_eq!(
            extract_keywords("Solar solar PANEL panel array"),
            vec!["solar", "panel", "array"]
        );
        assert!(extract_keywords("of the in").is_empty());
    }

    #[test]
    fn parses_large_image_with_fallback() {
        let body = json!({
            "total": 2,
            "hits": [
                {"largeImageURL": "https://cdn.example/large.jpg", "webformatURL": "https://cdn.example/web.jpg"},
                {"webformatURL": "https://cdn.example/web2.jpg"},
                {"id": 3}
            ]
        });
        assert_eq!(
            parse_pixabay_response(&body).unwrap(),
            vec![
                ImageHandle::Url("https://cdn.example/large.jpg".into()),
                ImageHandle::Url("https://cdn.example/web2.jpg".into()),
            ]
        );
    }

    #[test]
    fn missing_hits_is_invalid() {
        assert!(matches!(
            parse_pixabay_response(&json!({"error": "bad key"})),
            Err(ProviderError::InvalidResponse(_))
        ));
        assert_eq!(parse_pixabay_response(&json!({"hits": []})).unwrap(), vec![]);
    }
}
