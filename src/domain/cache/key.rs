//! Deterministic cache-key derivation

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::domain::search::SearchRequest;
use crate::domain::DomainError;

/// Opaque fixed-length identifier for a canonicalized search request
///
/// Two field-for-field equal requests always derive the same key; filter
/// insertion order is irrelevant because `SearchRequest` keeps its filters
/// in a `BTreeMap`, so the serialized form is order-stable by construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

/// Canonical serialization shape: field order is fixed here, never by the
/// caller.
#[derive(Serialize)]
struct CanonicalRequest<'a> {
    query: &'a str,
    top_k: usize,
    filters: &'a std::collections::BTreeMap<String, serde_json::Value>,
    min_score: f32,
}

impl CacheKey {
    /// Derive the key for a request
    ///
    /// Pure and deterministic; the only failure mode is a malformed request,
    /// which is rejected before derivation.
    pub fn derive(request: &SearchRequest) -> Result<Self, DomainError> {
        request.validate()?;

        let canonical = CanonicalRequest {
            query: &request.query,
            top_k: request.top_k,
            filters: &request.filters,
            min_score: request.min_score,
        };

        let serialized = serde_json::to_string(&canonical).map_err(|e| {
            DomainError::validation(format!("failed to canonicalize request: {}", e))
        })?;

        let mut hasher = Sha256::new();
        hasher.update(serialized.as_bytes());

        Ok(Self(hex::encode(hasher.finalize())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
