//! In-memory vector store for development and testing

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::vector_store::{PersonaRecord, VectorMatch, VectorStore};
use crate::domain::DomainError;

/// Vector store holding persona records in memory
///
/// Distances are cosine distances (`1 - cosine similarity`), matching the
/// metric the engine's score normalization assumes. Metadata filters are
/// attribute-equality, all conditions must hold.
#[derive(Debug, Default)]
pub struct InMemoryVectorStore {
    records: RwLock<Vec<PersonaRecord>>,
}

impl InMemoryVectorStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }
}

fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 1.0;
    }

    1.0 - dot / (norm_a * norm_b)
}

fn matches_filter(
    record: &PersonaRecord,
    filter: Option<&BTreeMap<String, serde_json::Value>>,
) -> bool {
    match filter {
        None => true,
        Some(filter) => filter
            .iter()
            .all(|(key, value)| record.metadata.get(key) == Some(value)),
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn query(
        &self,
        embedding: &[f32],
        filter: Option<&BTreeMap<String, serde_json::Value>>,
        limit: usize,
    ) -> Result<Vec<VectorMatch>, DomainError> {
        let records = self.records.read().await;

        let mut matches: Vec<VectorMatch> = records
            .iter()
            .filter(|record| matches_filter(record, filter))
            .map(|record| VectorMatch {
                id: record.id.clone(),
                distance: cosine_distance(embedding, &record.embedding),
                document: record.document.clone(),
                metadata: record.metadata.clone(),
            })
            .collect();

        matches.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        matches.truncate(limit);

        Ok(matches)
    }

    async fn add(&self, records: Vec<PersonaRecord>) -> Result<(), DomainError> {
        self.records.write().await.extend(records);
        Ok(())
    }

    fn collection_name(&self) -> &str {
        "in-memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, category: &str, embedding: Vec<f32>) -> PersonaRecord {
        PersonaRecord::new(id, format!("persona {}", id), embedding)
            .with_metadata("category", serde_json::json!(category))
    }

    #[tokio::test]
    async fn test_query_orders_by_ascending_distance() {
        let store = InMemoryVectorStore::new();
        store
            .add(vec![
                record("far", "law", vec![0.0, 1.0]),
                record("near", "finance", vec![1.0, 0.0]),
                record("middle", "finance", vec![1.0, 1.0]),
            ])
            .await
            .unwrap();

        let matches = store.query(&[1.0, 0.0], None, 10).await.unwrap();

        let ids: Vec<&str> = matches.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, ["near", "middle", "far"]);
        assert!(matches[0].distance < 1e-6);
    }

    #[tokio::test]
    async fn test_limit_truncates() {
        let store = InMemoryVectorStore::new();
        store
            .add((0..5).map(|i| record(&format!("p{}", i), "finance", vec![i as f32, 1.0])).collect())
            .await
            .unwrap();

        let matches = store.query(&[1.0, 1.0], None, 2).await.unwrap();
        assert_eq!(matches.len(), 2);
    }

    #[tokio::test]
    async fn test_equality_filter_applies() {
        let store = InMemoryVectorStore::new();
        store
            .add(vec![
                record("finance_001", "finance", vec![1.0, 0.0]),
                record("law_001", "law", vec![1.0, 0.1]),
            ])
            .await
            .unwrap();

        let mut filter = BTreeMap::new();
        filter.insert("category".to_string(), serde_json::json!("law"));
        let matches = store.query(&[1.0, 0.0], Some(&filter), 10).await.unwrap();

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].id, "law_001");
    }

    #[tokio::test]
    async fn test_identical_vector_has_zero_distance() {
        let store = InMemoryVectorStore::new();
        store
            .add(vec![record("same", "finance", vec![0.3, 0.4])])
            .await
            .unwrap();

        let matches = store.query(&[0.3, 0.4], None, 1).await.unwrap();
        assert!(matches[0].distance.abs() < 1e-6);
    }
}
