//! Retrieval engine - cached vector search and recommendation-guided search

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::completion::{CompletionOptions, CompletionProvider};
use crate::domain::{
    rank, CacheKey, DomainError, EmbeddingProvider, EnhancedSearchResult, ResultCache,
    SearchRequest, SearchResult, VectorStore,
};

/// Candidates fetched per requested result
///
/// Score filtering happens after retrieval, so more raw candidates are
/// pulled than requested to still satisfy top_k after drops. A heuristic
/// multiplier, not a guarantee: if fewer survive, fewer are returned.
const OVER_FETCH_FACTOR: usize = 2;

const RECOMMEND_SYSTEM_PROMPT: &str = "You are an expert on specialized assistant personas. \
Analyze the user's request and recommend the persona category that fits it best, \
described from an industry perspective: the professional domain and the capabilities it requires. \
Avoid generic assistant vocabulary in the description, since every catalog entry already carries it.";

/// Orchestrates cache, embedding, vector search, scoring and ranking
///
/// All collaborators are injected at construction; the engine holds no
/// global state. Each call is a self-contained unit of work with no internal
/// concurrency, but the shared cache and the embedding memo behind
/// `embedding` are safe for concurrent callers.
#[derive(Debug)]
pub struct RetrievalEngine {
    embedding: Arc<dyn EmbeddingProvider>,
    vector_store: Arc<dyn VectorStore>,
    completion: Arc<dyn CompletionProvider>,
    cache: Arc<dyn ResultCache>,
}

impl RetrievalEngine {
    pub fn new(
        embedding: Arc<dyn EmbeddingProvider>,
        vector_store: Arc<dyn VectorStore>,
        completion: Arc<dyn CompletionProvider>,
        cache: Arc<dyn ResultCache>,
    ) -> Self {
        Self {
            embedding,
            vector_store,
            completion,
            cache,
        }
    }

    /// Cached nearest-neighbor search over the persona catalog
    ///
    /// On a cache hit the cached list is returned verbatim, with no
    /// re-ranking or re-filtering. On a miss the query is embedded,
    /// `2 x top_k` candidates are fetched, scored as `1 - distance`
    /// (cosine distance, see the vector store implementations), filtered by
    /// `min_score`, ranked, truncated to `top_k` and cached.
    pub async fn search(&self, request: SearchRequest) -> Result<Vec<SearchResult>, DomainError> {
        let key = CacheKey::derive(&request)?;

        if let Some(cached) = self.cache.get(&key).await {
            debug!(key = %key, results = cached.len(), "search cache hit");
            return Ok(cached);
        }

        debug!(key = %key, "search cache miss");

        let embedding = self.embedding.embed(&request.query).await?;

        let candidates = self
            .vector_store
            .query(
                &embedding,
                request.effective_filters(),
                request.top_k * OVER_FETCH_FACTOR,
            )
            .await?;

        let surviving: Vec<SearchResult> = candidates
            .into_iter()
            .filter_map(|candidate| {
                let score = (1.0 - candidate.distance).clamp(0.0, 1.0);

                if score < request.min_score {
                    return None;
                }

                Some(SearchResult {
                    id: candidate.id,
                    score,
                    document: candidate.document,
                    metadata: candidate.metadata,
                })
            })
            .collect();

        let mut results = rank(surviving);
        results.truncate(request.top_k);

        info!(
            collection = self.vector_store.collection_name(),
            returned = results.len(),
            top_k = request.top_k,
            "search completed"
        );

        self.cache.put(&key, results.clone()).await;

        Ok(results)
    }

    /// Two-stage search: persona recommendation, then vector search over the
    /// composite of prompt and recommendation
    ///
    /// The recommendation text is never vector-compared on its own; it only
    /// steers the embedding through the composite query. A recommendation
    /// failure fails the whole operation rather than silently degrading to
    /// a bare vector search.
    pub async fn enhanced_search(
        &self,
        request: SearchRequest,
    ) -> Result<EnhancedSearchResult, DomainError> {
        request.validate()?;

        let prompt = request.query.clone();
        let recommendation = self.recommend_persona(&prompt).await?;

        debug!(
            prompt_len = prompt.len(),
            recommendation_len = recommendation.len(),
            "obtained persona recommendation"
        );

        let composite = compose_query(&prompt, &recommendation);
        let results = self
            .search(SearchRequest {
                query: composite,
                ..request
            })
            .await?;

        Ok(EnhancedSearchResult {
            original_prompt: prompt,
            recommendation,
            results,
        })
    }

    async fn recommend_persona(&self, prompt: &str) -> Result<String, DomainError> {
        let user_prompt = format!(
            "Based on the following request, recommend a suitable persona category: {}",
            prompt
        );

        self.completion
            .complete(
                RECOMMEND_SYSTEM_PROMPT,
                &user_prompt,
                CompletionOptions::new()
                    .with_temperature(0.7)
                    .with_max_tokens(500),
            )
            .await
    }
}

/// The composite text that actually gets embedded, with literal section
/// labels preserved
fn compose_query(prompt: &str, recommendation: &str) -> String {
    format!(
        "User request: {}\nRecommended persona: {}",
        prompt, recommendation
    )
}
