//! OpenAI embedding provider implementation

use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::embedding::EmbeddingProvider;
use crate::domain::DomainError;
use crate::infrastructure::http_client::HttpClientTrait;

const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";

/// OpenAI embedding provider
#[derive(Debug)]
pub struct OpenAiEmbeddingProvider<C: HttpClientTrait> {
    client: C,
    auth_header: String,
    base_url: String,
    model: String,
}

impl<C: HttpClientTrait> OpenAiEmbeddingProvider<C> {
    /// Create a new provider for the given embedding model
    pub fn new(client: C, api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self::with_base_url(client, api_key, model, DEFAULT_OPENAI_BASE_URL)
    }

    /// Create a new provider with custom base URL
    pub fn with_base_url(
        client: C,
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        let auth_header = format!("Bearer {}", api_key.into());
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Self {
            client,
            auth_header,
            base_url,
            model: model.into(),
        }
    }

    fn embeddings_url(&self) -> String {
        format!("{}/v1/embeddings", self.base_url)
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        vec![
            ("Authorization", self.auth_header.as_str()),
            ("Content-Type", "application/json"),
        ]
    }
}

#[async_trait]
impl<C: HttpClientTrait> EmbeddingProvider for OpenAiEmbeddingProvider<C> {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, DomainError> {
        let body = serde_json::json!({
            "model": self.model,
            "input": text,
        });

        let json = self
            .client
            .post_json(&self.embeddings_url(), self.headers(), &body)
            .await?;

        let response: OpenAiEmbeddingResponse = serde_json::from_value(json).map_err(|e| {
            DomainError::provider(
                "openai",
                format!("Failed to parse embedding response: {}", e),
            )
        })?;

        response
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| DomainError::provider("openai", "No embedding in response"))
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }
}

#[derive(Debug, Deserialize)]
struct OpenAiEmbeddingResponse {
    data: Vec<OpenAiEmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct OpenAiEmbeddingData {
    embedding: Vec<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::http_client::mock::MockHttpClient;

    const TEST_URL: &str = "https://api.openai.com/v1/embeddings";

    fn mock_response(dimensions: usize) -> serde_json::Value {
        let embedding: Vec<f32> = (0..dimensions).map(|i| i as f32 * 0.001).collect();
        serde_json::json!({
            "model": "text-embedding-3-small",
            "data": [{ "index": 0, "embedding": embedding, "object": "embedding" }],
            "usage": { "prompt_tokens": 4, "total_tokens": 4 }
        })
    }

    #[tokio::test]
    async fn test_embed_single_text() {
        let client = MockHttpClient::new().with_response(TEST_URL, mock_response(1536));
        let provider = OpenAiEmbeddingProvider::new(client, "test-key", "text-embedding-3-small");

        let vector = provider.embed("Hello world").await.unwrap();

        assert_eq!(vector.len(), 1536);
    }

    #[tokio::test]
    async fn test_request_carries_model_and_input() {
        let client = MockHttpClient::new().with_response(TEST_URL, mock_response(4));
        let provider = OpenAiEmbeddingProvider::new(client, "test-key", "text-embedding-3-small");

        provider.embed("stock portfolio").await.unwrap();

        let requests = provider.client.requests_to(TEST_URL);
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0]["model"], "text-embedding-3-small");
        assert_eq!(requests[0]["input"], "stock portfolio");
    }

    #[tokio::test]
    async fn test_embed_error_propagates() {
        let client = MockHttpClient::new().with_error(TEST_URL, "Rate limit exceeded");
        let provider = OpenAiEmbeddingProvider::new(client, "test-key", "text-embedding-3-small");

        let result = provider.embed("Hello").await;

        assert!(matches!(result, Err(DomainError::Provider { .. })));
    }

    #[tokio::test]
    async fn test_custom_base_url() {
        let custom_url = "http://localhost:8080/v1/embeddings";
        let client = MockHttpClient::new().with_response(custom_url, mock_response(8));
        let provider = OpenAiEmbeddingProvider::with_base_url(
            client,
            "test-key",
            "text-embedding-3-small",
            "http://localhost:8080",
        );

        let vector = provider.embed("Test").await.unwrap();
        assert_eq!(vector.len(), 8);
    }
}
