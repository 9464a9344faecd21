//! Embedding provider trait definition

use std::fmt::Debug;

use async_trait::async_trait;

use crate::domain::DomainError;

/// Trait for embedding providers (OpenAI, etc.)
#[async_trait]
pub trait EmbeddingProvider: Send + Sync + Debug {
    /// Convert text to a fixed-length vector
    async fn embed(&self, text: &str) -> Result<Vec<f32>, DomainError>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;
}
