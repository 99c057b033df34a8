//! Content fingerprints
//!
//! A normalized document is fingerprinted over its canonical JSON, so two
//! runs that parse to the same content log the same value. Diagram sources
//! and collaborator queries are fingerprinted from their parts to name
//! rendered files and to key cached results.

use std::fmt::{self, Display, Formatter};

/// Blake3 digest of some content
///
/// Displays as 64 hex chars; [`ContentHash::short`] gives the 16-char form
/// used in file names and log fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    /// Fingerprint of an ordered list of parts
    ///
    /// Each part is length-prefixed, so `["ab", "c"]` and `["a", "bc"]`
    /// differ.
    #[must_use]
    pub fn compute_parts(parts: &[&str]) -> Self {
        let mut hasher = blake3::Hasher::new();
        for part in parts {
            hasher.update(&(part.len() as u64).to_le_bytes());
            hasher.update(part.as_bytes());
        }
        Self(*hasher.finalize().as_bytes())
    }

    /// Fingerprint of a JSON value in its compact serialized form
    ///
    /// Object key order matters, which is why documents are fingerprinted
    /// through their canonical form.
    #[must_use]
    pub fn compute_json(value: &serde_json::Value) -> Self {
        Self(*blake3::hash(value.to_string().as_bytes()).as_bytes())
    }

    /// Leading 16 hex chars
    #[inline]
    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..8])
    }
}

impl Display for ContentHash {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parts_respect_boundaries() {
        assert_eq!(
            ContentHash::compute_parts(&["flowchart", "graph TD"]),
            ContentHash::compute_parts(&["flowchart", "graph TD"])
        );
        assert_ne!(
            ContentHash::compute_parts(&["ab", "c"]),
            ContentHash::compute_parts(&["a", "bc"])
        );
    }

    #[test]
    fn json_key_order_is_significant() {
        let a = json!({"Executive Summary": "A", "Problem Statement": "B"});
        let b = json!({"Problem Statement": "B", "Executive Summary": "A"});
        assert_eq!(ContentHash::compute_json(&a), ContentHash::compute_json(&a.clone()));
        assert_ne!(ContentHash::compute_json(&a), ContentHash::compute_json(&b));
    }

    #[test]
    fn short_is_prefix_of_display() {
        let hash = ContentHash::compute_parts(&["search", "carbon"]);
        let full = hash.to_string();
        assert_eq!(full.len(), 64);
        assert_eq!(hash.short().len(), 16);
        assert!(full.starts_with(&hash.short()));
    }
}
