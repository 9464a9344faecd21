//! Chroma REST vector store adapter

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::info;

use crate::domain::vector_store::{PersonaRecord, VectorMatch, VectorStore};
use crate::domain::DomainError;
use crate::infrastructure::http_client::HttpClientTrait;

/// Vector store backed by a Chroma server
///
/// The backing collection is resolved lazily on first use with
/// get-or-create semantics, so a missing collection is created instead of
/// failing the request. The collection is created with cosine space; the
/// engine's `1 - distance` score normalization depends on that metric.
#[derive(Debug)]
pub struct ChromaVectorStore<C: HttpClientTrait> {
    client: C,
    base_url: String,
    collection: String,
    collection_id: OnceCell<String>,
}

impl<C: HttpClientTrait> ChromaVectorStore<C> {
    pub fn new(client: C, base_url: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            collection: collection.into(),
            collection_id: OnceCell::new(),
        }
    }

    fn collections_url(&self) -> String {
        format!("{}/api/v1/collections", self.base_url)
    }

    fn collection_url(&self, id: &str, action: &str) -> String {
        format!("{}/api/v1/collections/{}/{}", self.base_url, id, action)
    }

    /// Resolve the collection id, creating the collection when absent
    async fn collection_id(&self) -> Result<&str, DomainError> {
        self.collection_id
            .get_or_try_init(|| async {
                let body = serde_json::json!({
                    "name": self.collection,
                    "get_or_create": true,
                    "metadata": { "hnsw:space": "cosine" },
                });

                let response = self
                    .client
                    .post_json(&self.collections_url(), vec![], &body)
                    .await?;

                let id = response
                    .get("id")
                    .and_then(|v| v.as_str())
                    .map(str::to_string)
                    .ok_or_else(|| DomainError::collection_unavailable(&self.collection))?;

                info!(collection = %self.collection, id = %id, "resolved chroma collection");
                Ok(id)
            })
            .await
            .map(String::as_str)
    }

    /// Chroma requires `$and` when more than one equality condition applies
    fn build_where(filter: &BTreeMap<String, serde_json::Value>) -> serde_json::Value {
        let equality = |key: &str, value: &serde_json::Value| {
            let mut condition = serde_json::Map::new();
            condition.insert(key.to_string(), value.clone());
            serde_json::Value::Object(condition)
        };

        if filter.len() == 1 {
            let (key, value) = filter.iter().next().expect("non-empty filter");
            return equality(key, value);
        }

        let conditions: Vec<serde_json::Value> = filter
            .iter()
            .map(|(key, value)| equality(key, value))
            .collect();

        serde_json::json!({ "$and": conditions })
    }
}

#[async_trait]
impl<C: HttpClientTrait> VectorStore for ChromaVectorStore<C> {
    async fn query(
        &self,
        embedding: &[f32],
        filter: Option<&BTreeMap<String, serde_json::Value>>,
        limit: usize,
    ) -> Result<Vec<VectorMatch>, DomainError> {
        let id = self.collection_id().await?;

        let mut body = serde_json::json!({
            "query_embeddings": [embedding],
            "n_results": limit,
            "include": ["documents", "metadatas", "distances"],
        });

        if let Some(filter) = filter {
            body["where"] = Self::build_where(filter);
        }

        let response = self
            .client
            .post_json(&self.collection_url(id, "query"), vec![], &body)
            .await?;

        parse_query_response(response)
    }

    async fn add(&self, records: Vec<PersonaRecord>) -> Result<(), DomainError> {
        if records.is_empty() {
            return Ok(());
        }

        let id = self.collection_id().await?;

        let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        let documents: Vec<&str> = records.iter().map(|r| r.document.as_str()).collect();
        let embeddings: Vec<&[f32]> = records.iter().map(|r| r.embedding.as_slice()).collect();
        let metadatas: Vec<&HashMap<String, serde_json::Value>> =
            records.iter().map(|r| &r.metadata).collect();

        let body = serde_json::json!({
            "ids": ids,
            "documents": documents,
            "embeddings": embeddings,
            "metadatas": metadatas,
        });

        self.client
            .post_json(&self.collection_url(id, "add"), vec![], &body)
            .await?;

        info!(collection = %self.collection, count = records.len(), "indexed persona records");
        Ok(())
    }

    fn collection_name(&self) -> &str {
        &self.collection
    }
}

/// Chroma returns parallel column arrays nested one level per query vector
fn parse_query_response(response: serde_json::Value) -> Result<Vec<VectorMatch>, DomainError> {
    let first = |field: &str| -> Option<Vec<serde_json::Value>> {
        response
            .get(field)
            .and_then(|v| v.get(0))
            .and_then(|v| v.as_array())
            .cloned()
    };

    let ids = first("ids")
        .ok_or_else(|| DomainError::provider("chroma", "query response missing ids"))?;
    let distances = first("distances").unwrap_or_default();
    let documents = first("documents").unwrap_or_default();
    let metadatas = first("metadatas").unwrap_or_default();

    let mut matches = Vec::with_capacity(ids.len());

    for (i, id) in ids.iter().enumerate() {
        let id = id
            .as_str()
            .ok_or_else(|| DomainError::provider("chroma", "non-string id in query response"))?;

        let distance = distances
            .get(i)
            .and_then(|v| v.as_f64())
            .ok_or_else(|| DomainError::provider("chroma", "missing distance in query response"))?
            as f32;

        let document = documents
            .get(i)
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();

        let metadata: HashMap<String, serde_json::Value> = metadatas
            .get(i)
            .and_then(|v| v.as_object())
            .map(|obj| obj.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default();

        matches.push(VectorMatch {
            id: id.to_string(),
            distance,
            document,
            metadata,
        });
    }

    Ok(matches)
}
