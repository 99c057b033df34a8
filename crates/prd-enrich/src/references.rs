//! Merging search results into the References section
//!
//! Author items keep their order and come first. Discovered items follow in
//! search-term order, then provider rank, deduplicated by normalized URL.

use crate::collaborator::SearchHit;
use prd_schema::{Reference, SectionContent};
use std::collections::HashSet;
use url::Url;

/// Canonical form of a URL for deduplication
///
/// Scheme and host are lowercased by parsing, the fragment is dropped, and a
/// trailing `/` on the path is ignored. Unparseable input falls back to its
/// trimmed, lowercased text.
#[must_use]
pub fn normalize_url(raw: &str) -> String {
    let raw = raw.trim();
    match Url::parse(raw) {
        Ok(mut url) => {
            url.set_fragment(None);
            let text = url.to_string();
            match text.strip_suffix('/') {
                Some(stripped) if url.query().is_none() => stripped.to_string(),
                _ => text,
            }
        }
        Err(_) => raw.trim_end_matches('/').to_lowercase(),
    }
}

/// Append unseen hits to `content`, returning how many were added
///
/// `hits_per_term` must already be in search-term order.
pub fn merge_hits(
    content: &mut SectionContent,
    hits_per_term: &[Vec<SearchHit>],
    max_per_term: usize,
) -> usize {
    let mut seen: HashSet<String> = content
        .entries()
        .filter_map(|item| Reference::parse(item).url)
        .map(|url| normalize_url(&url))
        .collect();

    let mut added = 0;
    for hits in hits_per_term {
        for hit in hits.iter().take(max_per_term) {
            if hit.url.trim().is_empty() {
                continue;
            }
            if seen.insert(normalize_url(&hit.url)) {
                content.push_item(hit.citation());
                added += 1;
            }
        }
    }
    added
}
