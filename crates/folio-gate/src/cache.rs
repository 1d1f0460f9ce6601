//! Content cache using moka
//!
//! Keyed by [`ContentKey`]. Only the version gate seeds entries; readers go
//! through [`ContentCache::get_or_fetch`], which fetches once on a miss and
//! coalesces concurrent misses for the same key.

use crate::config::GateConfig;
use folio_cms::{CmsError, Content, ContentKey, ContentSource};
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;

/// In-process cache of content blocks
#[derive(Debug, Clone)]
pub struct ContentCache {
    inner: Cache<ContentKey, Arc<Content>>,
}

impl ContentCache {
    /// Create cache with max capacity
    #[inline]
    #[must_use]
    pub fn new(max_capacity: u64) -> Self {
        Self {
            inner: Cache::new(max_capacity),
        }
    }

    /// Create cache with time-based expiration
    #[inline]
    #[must_use]
    pub fn with_ttl(max_capacity: u64, ttl: Duration) -> Self {
        Self {
            inner: Cache::builder()
                .max_capacity(max_capacity)
                .time_to_live(ttl)
                .build(),
        }
    }

    /// Create cache sized by `config`
    #[must_use]
    pub fn from_config(config: &GateConfig) -> Self {
        Self::with_ttl(config.cache_capacity, config.cache_ttl)
    }

    /// Put a known-fresh block under its own key
    pub async fn seed(&self, content: Content) {
        self.inner.insert(content.key(), Arc::new(content)).await;
    }

    /// Cached block, if present
    #[inline]
    pub async fn get(&self, key: ContentKey) -> Option<Arc<Content>> {
        self.inner.get(&key).await
    }

    /// Cached block, fetching it from `source` on a miss
    ///
    /// # Errors
    ///
    /// The fetch error, shared between all callers that waited on it.
    /// Failed fetches are not cached.
    pub async fn get_or_fetch<S>(&self, key: ContentKey, source: &S) -> Result<Arc<Content>, Arc<CmsError>>
    where
        S: ContentSource + ?Sized,
    {
        self.inner
            .try_get_with(key, async move {
                tracing::debug!("Cache miss for '{}', fetching", key);
                source.fetch_content(key).await.map(Arc::new)
            })
            .await
    }

    /// Whether `key` is cached
    #[inline]
    pub async fn contains(&self, key: ContentKey) -> bool {
        self.inner.get(&key).await.is_some()
    }

    /// Drop one entry
    #[inline]
    pub async fn invalidate(&self, key: ContentKey) {
        self.inner.invalidate(&key).await;
    }

    /// Drop every entry
    #[inline]
    pub fn invalidate_all(&self) {
        self.inner.invalidate_all();
    }

    /// Drop every entry and wait until they are gone
    pub async fn clear(&self) {
        self.inner.invalidate_all();
        self.inner.run_pending_tasks().await;
    }

    /// Number of entries, after pending maintenance has run
    pub async fn len(&self) -> u64 {
        self.inner.run_pending_tasks().await;
        self.inner.entry_count()
    }

    /// Whether the cache holds nothing
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Every cached block, ordered by key
    #[must_use]
    pub fn snapshot(&self) -> Vec<Content> {
        let mut blocks: Vec<Content> = self
            .inner
            .iter()
            .map(|(_, content)| Content::clone(&content))
            .collect();
        blocks.sort_by_key(Content::key);
        blocks
    }

    /// Seed every block of a snapshot
    pub async fn hydrate(&self, blocks: Vec<Content>) {
        for content in blocks {
            self.seed(content).await;
        }
    }
}

impl Default for ContentCache {
    /// Cache sized by [`GateConfig::default`]
    fn default() -> Self {
        Self::from_config(&GateConfig::default())
    }
}
