//! Embedding provider implementations

mod memoized;
mod openai;

pub use memoized::MemoizedEmbeddingProvider;
pub use openai::OpenAiEmbeddingProvider;
