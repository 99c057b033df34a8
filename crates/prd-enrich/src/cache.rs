//! Collaborator result cache
//!
//! A rendered diagram, an image query or a web search is looked up by the
//! fingerprint of its request before the call goes out. Only successes are
//! stored: a timeout or provider error is retried on the next run. Entries
//! expire after the configured TTL, and the least useful ones are evicted
//! once the entry limit is reached.

use moka::future::Cache;
use prd_schema::{ContentHash, DiagramKind};
use std::future::Future;
use std::time::Duration;

/// Entries kept before eviction starts
pub const DEFAULT_CAPACITY: u64 = 1_000;

/// How long a collaborator result stays fresh (one day)
pub const DEFAULT_TTL: Duration = Duration::from_secs(86_400);

/// Request fingerprint, namespaced by collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey(ContentHash);

impl CacheKey {
    /// Same source and kind render to the same image
    #[must_use]
    pub fn diagram(kind: DiagramKind, source: &str) -> Self {
        Self(ContentHash::compute_parts(&["diagram", kind.as_str(), source]))
    }

    /// Image lookup by description
    #[must_use]
    pub fn images(query: &str) -> Self {
        Self(ContentHash::compute_parts(&["images", query]))
    }

    /// Reference search by term
    #[must_use]
    pub fn search(query: &str) -> Self {
        Self(ContentHash::compute_parts(&["search", query]))
    }

    /// Fingerprint, for log fields
    #[inline]
    #[must_use]
    pub fn hash(&self) -> &ContentHash {
        &self.0
    }
}

/// Cache occupancy
#[derive(Debug, Clone, Copy, Default)]
pub struct CacheStats {
    /// Stored results; expired entries count until [`EnrichmentCache::sync`] runs
    pub entry_count: u64,
}

/// Expiring store of one collaborator's successful results
#[derive(Debug, Clone)]
pub struct EnrichmentCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    inner: Cache<CacheKey, V>,
}

impl<V> EnrichmentCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Keep at most `max_capacity` results, each for `ttl`
    #[must_use]
    pub fn new(max_capacity: u64, ttl: Duration) -> Self {
        Self {
            inner: Cache::builder()
                .max_capacity(max_capacity)
                .time_to_live(ttl)
                .build(),
        }
    }

    /// Fresh result for `key`, if one is stored
    pub async fn get(&self, key: &CacheKey) -> Option<V> {
        self.inner.get(key).await
    }

    /// Store a successful result
    pub async fn insert(&self, key: CacheKey, value: V) {
        self.inner.insert(key, value).await;
    }

    /// Return the stored result, or make the call and keep what it returns
    ///
    /// Concurrent misses on one key each make their own call.
    ///
    /// # Errors
    /// Returns the call's error unchanged and stores nothing
    pub async fn try_get_or_insert_with<E, F, Fut>(&self, key: CacheKey, f: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        match self.inner.get(&key).await {
            Some(stored) => {
                tracing::trace!(key = %key.hash().short(), "reusing stored collaborator result");
                Ok(stored)
            }
            None => {
                let fresh = f().await?;
                self.inner.insert(key, fresh.clone()).await;
                Ok(fresh)
            }
        }
    }

    /// Forget every stored result
    pub fn invalidate_all(&self) {
        self.inner.invalidate_all();
    }

    /// Current occupancy
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entry_count: self.inner.entry_count(),
        }
    }

    /// Run pending expiry and eviction so [`Self::stats`] is exact
    pub async fn sync(&self) {
        self.inner.run_pending_tasks().await;
    }
}

impl<V> Default for EnrichmentCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// [`DEFAULT_CAPACITY`] results, each fresh for [`DEFAULT_TTL`]
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY, DEFAULT_TTL)
    }
}
