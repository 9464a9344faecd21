//! Vector store trait definition

use std::collections::{BTreeMap, HashMap};
use std::fmt::Debug;

use async_trait::async_trait;

use crate::domain::DomainError;

/// A raw nearest-neighbor candidate as reported by the store
///
/// `distance` is a dissimilarity metric where 0 means identical. The engine
/// assumes cosine distance; both bundled implementations guarantee it.
#[derive(Debug, Clone)]
pub struct VectorMatch {
    pub id: String,
    pub distance: f32,
    pub document: String,
    pub metadata: HashMap<String, serde_json::Value>,
}

/// A persona record to index
#[derive(Debug, Clone)]
pub struct PersonaRecord {
    /// Persona identifier (e.g. `finance_001`)
    pub id: String,
    /// Persona description text
    pub document: String,
    /// Embedding of the description
    pub embedding: Vec<f32>,
    /// Metadata key-value pairs (category etc.)
    pub metadata: HashMap<String, serde_json::Value>,
}

impl PersonaRecord {
    pub fn new(id: impl Into<String>, document: impl Into<String>, embedding: Vec<f32>) -> Self {
        Self {
            id: id.into(),
            document: document.into(),
            embedding,
            metadata: HashMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}

/// Trait for nearest-neighbor stores over the persona catalog
///
/// Implementations must create their backing collection on first use when it
/// does not exist, and must support attribute-equality metadata filters.
#[async_trait]
pub trait VectorStore: Send + Sync + Debug {
    /// Return up to `limit` nearest neighbors for the query vector, ordered
    /// by ascending distance. `filter` is `None` when no filtering applies;
    /// an empty filter map is never passed.
    async fn query(
        &self,
        embedding: &[f32],
        filter: Option<&BTreeMap<String, serde_json::Value>>,
        limit: usize,
    ) -> Result<Vec<VectorMatch>, DomainError>;

    /// Index persona records, creating the collection if needed
    async fn add(&self, records: Vec<PersonaRecord>) -> Result<(), DomainError>;

    /// Name of the backing collection
    fn collection_name(&self) -> &str;
}
