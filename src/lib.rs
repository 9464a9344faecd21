//! Persona retrieval engine
//!
//! Recommends a specialized persona for a natural-language query by
//! combining a semantic recommendation step with nearest-neighbor retrieval
//! over a persona catalog, caching repeated queries to avoid redundant
//! network calls.

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;
use std::time::Duration;

use infrastructure::cache::{InMemoryResultCache, InMemoryResultCacheConfig};
use infrastructure::completion::OpenAiCompletionProvider;
use infrastructure::embedding::{MemoizedEmbeddingProvider, OpenAiEmbeddingProvider};
use infrastructure::http_client::HttpClient;
use infrastructure::services::{CatalogService, RetrievalEngine};
use infrastructure::vector_store::ChromaVectorStore;

/// Wire a retrieval engine from configuration
///
/// All collaborators are constructed here and injected; nothing is global.
pub fn create_engine(config: &AppConfig) -> RetrievalEngine {
    let http = HttpClient::with_timeout(Duration::from_secs(config.openai.timeout_secs));

    let embedding = Arc::new(MemoizedEmbeddingProvider::new(Arc::new(
        OpenAiEmbeddingProvider::with_base_url(
            http.clone(),
            &config.openai.api_key,
            &config.openai.embedding_model,
            &config.openai.base_url,
        ),
    )));

    let completion = Arc::new(OpenAiCompletionProvider::with_base_url(
        http.clone(),
        &config.openai.api_key,
        &config.openai.chat_model,
        &config.openai.base_url,
    ));

    let vector_store = Arc::new(ChromaVectorStore::new(
        http,
        &config.chroma.base_url,
        &config.chroma.collection,
    ));

    let cache = Arc::new(InMemoryResultCache::with_config(
        InMemoryResultCacheConfig::default()
            .with_ttl(Duration::from_secs(config.cache.ttl_secs))
            .with_max_capacity(config.cache.max_capacity),
    ));

    RetrievalEngine::new(embedding, vector_store, completion, cache)
}

/// Wire the catalog bootstrap service from configuration
pub fn create_catalog_service(config: &AppConfig) -> CatalogService {
    let http = HttpClient::with_timeout(Duration::from_secs(config.openai.timeout_secs));

    let completion = Arc::new(OpenAiCompletionProvider::with_base_url(
        http.clone(),
        &config.openai.api_key,
        &config.openai.chat_model,
        &config.openai.base_url,
    ));

    let embedding = Arc::new(OpenAiEmbeddingProvider::with_base_url(
        http.clone(),
        &config.openai.api_key,
        &config.openai.embedding_model,
        &config.openai.base_url,
    ));

    let vector_store = Arc::new(ChromaVectorStore::new(
        http,
        &config.chroma.base_url,
        &config.chroma.collection,
    ));

    CatalogService::new(completion, embedding, vector_store)
}
