//! Domain layer - Core entities, traits and the error taxonomy

pub mod cache;
pub mod completion;
pub mod embedding;
pub mod error;
pub mod ranking;
pub mod search;
pub mod vector_store;

pub use cache::{CacheKey, ResultCache};
pub use completion::{CompletionOptions, CompletionProvider};
pub use embedding::EmbeddingProvider;
pub use error::DomainError;
pub use ranking::rank;
pub use search::{
    EnhancedSearchResult, SearchRequest, SearchResult, DEFAULT_MIN_SCORE, DEFAULT_TOP_K,
};
pub use vector_store::{PersonaRecord, VectorMatch, VectorStore};
