//! Exact-text embedding memoization

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::embedding::EmbeddingProvider;
use crate::domain::DomainError;

/// Decorator that memoizes embeddings by exact text equality
///
/// Retention is unbounded for the process lifetime. Memoization assumes the
/// wrapped provider is deterministic: identical text always yields an
/// identical vector. If the upstream service is non-deterministic this memo
/// returns the first vector it saw for a text; that is an accepted
/// assumption of the design, not something this layer papers over.
///
/// Only successful responses are memoized; failures pass through untouched
/// and the next call retries upstream.
#[derive(Debug)]
pub struct MemoizedEmbeddingProvider {
    inner: Arc<dyn EmbeddingProvider>,
    memo: RwLock<HashMap<String, Vec<f32>>>,
}

impl MemoizedEmbeddingProvider {
    pub fn new(inner: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            inner,
            memo: RwLock::new(HashMap::new()),
        }
    }

    /// Number of memoized texts
    pub async fn memo_len(&self) -> usize {
        self.memo.read().await.len()
    }
}

#[async_trait]
impl EmbeddingProvider for MemoizedEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, DomainError> {
        if let Some(vector) = self.memo.read().await.get(text) {
            debug!(provider = self.inner.provider_name(), "embedding memo hit");
            return Ok(vector.clone());
        }

        let vector = self.inner.embed(text).await?;

        self.memo
            .write()
            .await
            .insert(text.to_string(), vector.clone());

        Ok(vector)
    }

    fn provider_name(&self) -> &'static str {
        self.inner.provider_name()
    }
}
