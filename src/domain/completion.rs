//! Completion provider trait definition

use std::fmt::Debug;

use async_trait::async_trait;

use crate::domain::DomainError;

/// Generation parameters for a completion call
#[derive(Debug, Clone, Default)]
pub struct CompletionOptions {
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    /// Ask the provider for a JSON object response
    pub json_response: bool,
}

impl CompletionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_json_response(mut self) -> Self {
        self.json_response = true;
        self
    }
}

/// Trait for free-text completion providers
///
/// The persona recommendation step and the catalog bootstrap both go through
/// this seam. Streaming variants are out of scope for the engine.
#[async_trait]
pub trait CompletionProvider: Send + Sync + Debug {
    /// Produce a completion for a system/user prompt pair
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        options: CompletionOptions,
    ) -> Result<String, DomainError>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Mock provider returning a scripted completion
    #[derive(Debug, Default)]
    pub struct MockCompletionProvider {
        response: Option<String>,
        error: Option<String>,
        calls: AtomicUsize,
    }

    impl MockCompletionProvider {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_response(mut self, response: impl Into<String>) -> Self {
            self.response = Some(response.into());
            self
        }

        pub fn with_error(mut self, error: impl Into<String>) -> Self {
            self.error = Some(error.into());
            self
        }

        /// Number of times `complete` was invoked
        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CompletionProvider for MockCompletionProvider {
        async fn complete(
            &self,
            _system_prompt: &str,
            _user_prompt: &str,
            _options: CompletionOptions,
        ) -> Result<String, DomainError> {
            self.calls.fetch_add(1, Ordering::SeqCst);

            if let Some(ref error) = self.error {
                return Err(DomainError::provider("mock-completion", error));
            }

            self.response.clone().ok_or_else(|| {
                DomainError::provider("mock-completion", "no mock response configured")
            })
        }

        fn provider_name(&self) -> &'static str {
            "mock-completion"
        }
    }
}
