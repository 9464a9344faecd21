//! Search request and result entities

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Default number of results returned by a search
pub const DEFAULT_TOP_K: usize = 3;

/// Default minimum similarity score
pub const DEFAULT_MIN_SCORE: f32 = 0.4;

/// A fully specified retrieval query
///
/// Immutable once constructed; its canonical serialization fully determines
/// the cache key. Filters live in a `BTreeMap` so serialization order never
/// depends on insertion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Query text to embed and search for
    pub query: String,
    /// Number of results to return
    pub top_k: usize,
    /// Attribute-equality metadata filters
    pub filters: BTreeMap<String, serde_json::Value>,
    /// Minimum similarity threshold (0.0 - 1.0)
    pub min_score: f32,
}

impl SearchRequest {
    /// Create a request with the default top_k and min_score
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            top_k: DEFAULT_TOP_K,
            filters: BTreeMap::new(),
            min_score: DEFAULT_MIN_SCORE,
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_min_score(mut self, min_score: f32) -> Self {
        self.min_score = min_score;
        self
    }

    /// Add an attribute-equality filter
    pub fn with_filter(mut self, attribute: impl Into<String>, value: serde_json::Value) -> Self {
        self.filters.insert(attribute.into(), value);
        self
    }

    /// Set all filters at once
    pub fn with_filters(mut self, filters: BTreeMap<String, serde_json::Value>) -> Self {
        self.filters = filters;
        self
    }

    /// Reject malformed requests before any I/O or key derivation
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.top_k == 0 {
            return Err(DomainError::validation("top_k must be positive"));
        }

        if !self.min_score.is_finite() {
            return Err(DomainError::validation("min_score must be finite"));
        }

        if !(0.0..=1.0).contains(&self.min_score) {
            return Err(DomainError::validation(format!(
                "min_score must be within [0, 1], got {}",
                self.min_score
            )));
        }

        Ok(())
    }

    /// The filter map to send to the vector store
    ///
    /// An empty map must not be sent as a restrictive empty-match filter.
    pub fn effective_filters(&self) -> Option<&BTreeMap<String, serde_json::Value>> {
        if self.filters.is_empty() {
            None
        } else {
            Some(&self.filters)
        }
    }
}

/// A single scored persona match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Persona identifier
    pub id: String,
    /// Similarity score (0.0 - 1.0, higher is more similar)
    pub score: f32,
    /// Persona description text
    pub document: String,
    /// Persona metadata (category etc.)
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl SearchResult {
    pub fn new(id: impl Into<String>, score: f32, document: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            score,
            document: document.into(),
            metadata: HashMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}

/// Result of the two-stage enhanced search
///
/// Wraps a result batch with the recommendation context that produced it.
/// Used for presentation only; it is never cached independently of the
/// underlying search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnhancedSearchResult {
    pub original_prompt: String,
    pub recommendation: String,
    pub results: Vec<SearchResult>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let request = SearchRequest::new("stock portfolio help");
        assert_eq!(request.top_k, 3);
        assert_eq!(request.min_score, 0.4);
        assert!(request.filters.is_empty());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_zero_top_k_rejected() {
        let request = SearchRequest::new("query").with_top_k(0);
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_min_score_out_of_range_rejected() {
        assert!(SearchRequest::new("q").with_min_score(1.5).validate().is_err());
        assert!(SearchRequest::new("q").with_min_score(-0.1).validate().is_err());
        assert!(SearchRequest::new("q").with_min_score(f32::NAN).validate().is_err());
    }

    #[test]
    fn test_empty_filters_are_not_sent() {
        let request = SearchRequest::new("query");
        assert!(request.effective_filters().is_none());

        let request = request.with_filter("category", serde_json::json!("finance"));
        assert!(request.effective_filters().is_some());
    }

    #[test]
    fn test_result_serialization_skips_empty_metadata() {
        let result = SearchResult::new("finance_001", 0.9, "A portfolio analyst");
        let json = serde_json::to_string(&result).unwrap();
        assert!(!json.contains("metadata"));

        let result = result.with_metadata("category", serde_json::json!("finance"));
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"category\":\"finance\""));
    }
}
