//! In-memory result cache implementation using moka

use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache as MokaCache;
use tracing::debug;

use crate::domain::cache::{CacheKey, ResultCache};
use crate::domain::search::SearchResult;

/// Configuration for the in-memory result cache
#[derive(Debug, Clone)]
pub struct InMemoryResultCacheConfig {
    /// Maximum number of entries before moka evicts
    pub max_capacity: u64,
    /// Time-to-live for cached result lists
    pub ttl: Duration,
}

impl Default for InMemoryResultCacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: 1_000,
            ttl: Duration::from_secs(3600),
        }
    }
}

impl InMemoryResultCacheConfig {
    pub fn with_max_capacity(mut self, capacity: u64) -> Self {
        self.max_capacity = capacity;
        self
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

/// Cache entry stored in moka
///
/// Owned exclusively by the cache and replaced whole on every put.
#[derive(Debug, Clone)]
struct CacheEntry {
    results: Vec<SearchResult>,
    /// Creation timestamp (millis since epoch)
    created_at: u64,
}

/// Thread-safe result cache with lazy TTL expiry
///
/// The `created_at` check on access is authoritative: a stale entry is
/// removed the first time it is observed, with no background sweep. moka's
/// own time-to-live is set as a backstop and its capacity bound keeps the
/// cache from growing without limit.
#[derive(Debug)]
pub struct InMemoryResultCache {
    cache: MokaCache<String, CacheEntry>,
    ttl_millis: u64,
}

impl InMemoryResultCache {
    pub fn new() -> Self {
        Self::with_config(InMemoryResultCacheConfig::default())
    }

    pub fn with_config(config: InMemoryResultCacheConfig) -> Self {
        let cache = MokaCache::builder()
            .max_capacity(config.max_capacity)
            .time_to_live(config.ttl)
            .build();

        Self {
            cache,
            ttl_millis: config.ttl.as_millis() as u64,
        }
    }

    fn current_time_millis() -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }

    fn is_expired(&self, entry: &CacheEntry) -> bool {
        Self::current_time_millis().saturating_sub(entry.created_at) >= self.ttl_millis
    }
}

impl Default for InMemoryResultCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResultCache for InMemoryResultCache {
    async fn get(&self, key: &CacheKey) -> Option<Vec<SearchResult>> {
        match self.cache.get(key.as_str()).await {
            Some(entry) => {
                if self.is_expired(&entry) {
                    debug!(key = %key, "cache entry expired, removing");
                    self.cache.remove(key.as_str()).await;
                    return None;
                }

                Some(entry.results.clone())
            }
            None => None,
        }
    }

    async fn put(&self, key: &CacheKey, results: Vec<SearchResult>) {
        let entry = CacheEntry {
            results,
            created_at: Self::current_time_millis(),
        };

        self.cache.insert(key.as_str().to_string(), entry).await;
    }

    async fn len(&self) -> usize {
        self.cache.run_pending_tasks().await;
        self.cache.entry_count() as usize
    }
}
