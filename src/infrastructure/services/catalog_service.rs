//! Persona catalog bootstrap

use std::sync::Arc;

use serde::Deserialize;
use tracing::info;

use crate::domain::completion::{CompletionOptions, CompletionProvider};
use crate::domain::{DomainError, EmbeddingProvider, PersonaRecord, VectorStore};

const GENERATOR_SYSTEM_PROMPT: &str = "You are a persona catalog generator. \
For every category you are given, produce one persona entry with an id of the form \
<category>_<number> (for example finance_001), a detailed description of the persona's \
professional domain and capabilities, and the category itself. \
Respond strictly as a JSON object of the form \
{\"personas\": [{\"id\": \"...\", \"description\": \"...\", \"category\": \"...\"}]}.";

/// A generated persona entry
#[derive(Debug, Clone, Deserialize)]
pub struct PersonaSeed {
    pub id: String,
    pub description: String,
    pub category: String,
}

#[derive(Debug, Deserialize)]
struct PersonaPayload {
    personas: Vec<PersonaSeed>,
}

/// Populates the persona catalog the retrieval engine reads from
///
/// One completion call generates descriptions for all categories at once;
/// each description is embedded and indexed with its category as metadata.
#[derive(Debug)]
pub struct CatalogService {
    completion: Arc<dyn CompletionProvider>,
    embedding: Arc<dyn EmbeddingProvider>,
    vector_store: Arc<dyn VectorStore>,
}

impl CatalogService {
    pub fn new(
        completion: Arc<dyn CompletionProvider>,
        embedding: Arc<dyn EmbeddingProvider>,
        vector_store: Arc<dyn VectorStore>,
    ) -> Self {
        Self {
            completion,
            embedding,
            vector_store,
        }
    }

    /// Generate, embed and index personas for the given categories
    pub async fn seed(&self, categories: &[String]) -> Result<Vec<PersonaSeed>, DomainError> {
        if categories.is_empty() {
            return Err(DomainError::validation("no categories to seed"));
        }

        let seeds = self.generate_personas(categories).await?;

        let mut records = Vec::with_capacity(seeds.len());

        for seed in &seeds {
            let embedding = self.embedding.embed(&seed.description).await?;

            records.push(
                PersonaRecord::new(&seed.id, &seed.description, embedding)
                    .with_metadata("category", serde_json::json!(seed.category)),
            );
        }

        self.vector_store.add(records).await?;

        info!(
            collection = self.vector_store.collection_name(),
            personas = seeds.len(),
            "persona catalog seeded"
        );

        Ok(seeds)
    }

    /// One completion call for all categories; a transport failure stays a
    /// provider error, unparseable content becomes an initialization error
    async fn generate_personas(
        &self,
        categories: &[String],
    ) -> Result<Vec<PersonaSeed>, DomainError> {
        let user_prompt = format!(
            "Generate one persona entry for each of these categories: {}",
            categories.join(", ")
        );

        let content = self
            .completion
            .complete(
                GENERATOR_SYSTEM_PROMPT,
                &user_prompt,
                CompletionOptions::new()
                    .with_temperature(0.7)
                    .with_json_response(),
            )
            .await?;

        let payload: PersonaPayload = serde_json::from_str(&content).map_err(|e| {
            DomainError::initialization(format!("unparseable persona payload: {}", e))
        })?;

        if payload.personas.is_empty() {
            return Err(DomainError::initialization("persona payload was empty"));
        }

        Ok(payload.personas)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::completion::mock::MockCompletionProvider;
    use crate::domain::embedding::mock::MockEmbeddingProvider;
    use crate::infrastructure::vector_store::InMemoryVectorStore;
    use std::collections::BTreeMap;

    fn persona_json() -> String {
        serde_json::json!({
            "personas": [
                { "id": "finance_001", "description": "Advises on portfolios and markets.", "category": "finance" },
                { "id": "law_001", "description": "Reviews contracts and legal questions.", "category": "law" },
            ]
        })
        .to_string()
    }

    fn service(completion: MockCompletionProvider) -> (CatalogService, Arc<InMemoryVectorStore>) {
        let store = Arc::new(InMemoryVectorStore::new());
        let service = CatalogService::new(
            Arc::new(completion),
            Arc::new(MockEmbeddingProvider::new(8)),
            store.clone(),
        );
        (service, store)
    }

    #[tokio::test]
    async fn test_seed_indexes_generated_personas() {
        let (service, store) =
            service(MockCompletionProvider::new().with_response(persona_json()));

        let seeds = service
            .seed(&["finance".to_string(), "law".to_string()])
            .await
            .unwrap();

        assert_eq!(seeds.len(), 2);
        assert_eq!(store.len().await, 2);

        // Category metadata must be queryable
        let mut filter = BTreeMap::new();
        filter.insert("category".to_string(), serde_json::json!("law"));
        let matches = store.query(&[0.1; 8], Some(&filter), 10).await.unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].id, "law_001");
    }

    #[tokio::test]
    async fn test_malformed_payload_is_initialization_error() {
        let (service, store) =
            service(MockCompletionProvider::new().with_response("not json at all"));

        let result = service.seed(&["finance".to_string()]).await;

        assert!(matches!(result, Err(DomainError::Initialization { .. })));
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn test_empty_payload_is_initialization_error() {
        let (service, _) = service(
            MockCompletionProvider::new().with_response(r#"{ "personas": [] }"#),
        );

        let result = service.seed(&["finance".to_string()]).await;

        assert!(matches!(result, Err(DomainError::Initialization { .. })));
    }

    #[tokio::test]
    async fn test_transport_failure_stays_provider_error() {
        let (service, _) = service(MockCompletionProvider::new().with_error("unreachable"));

        let result = service.seed(&["finance".to_string()]).await;

        assert!(matches!(result, Err(DomainError::Provider { .. })));
    }

    #[tokio::test]
    async fn test_no_categories_rejected() {
        let (service, _) = service(MockCompletionProvider::new());

        let result = service.seed(&[]).await;

        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }
}
