//! Result cache trait definition

use std::fmt::Debug;

use async_trait::async_trait;

use super::CacheKey;
use crate::domain::search::SearchResult;

/// Time-boxed cache of fully processed result lists
///
/// The trait is infallible on purpose: a cache-layer problem degrades to a
/// miss, it never propagates an error to the search caller. Implementations
/// must be safe for concurrent use and must make the check-TTL-then-remove
/// sequence atomic with respect to other readers.
#[async_trait]
pub trait ResultCache: Send + Sync + Debug {
    /// Returns the cached results for a key, or `None` when absent or stale.
    ///
    /// A stale entry is removed on this access (lazy expiry, no background
    /// sweep).
    async fn get(&self, key: &CacheKey) -> Option<Vec<SearchResult>>;

    /// Stores results under a key, unconditionally replacing any previous
    /// entry and restarting its TTL.
    async fn put(&self, key: &CacheKey, results: Vec<SearchResult>);

    /// Approximate number of live entries
    async fn len(&self) -> usize;

    async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
