use thiserror::Error;

/// Core domain errors
///
/// A closed taxonomy so callers can branch on the kind of failure instead of
/// parsing messages. Cache trouble is deliberately absent: the result cache
/// degrades to a miss and never surfaces an error.
#[derive(Debug, Error)]
pub enum DomainError {
    /// Request rejected before any I/O (non-positive top_k, min_score
    /// outside [0, 1], non-finite values)
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// An upstream call (embedding, vector store, completion) failed
    #[error("Provider error: {provider} - {message}")]
    Provider { provider: String, message: String },

    /// The backing vector collection does not exist yet
    #[error("Collection '{collection}' is unavailable")]
    CollectionUnavailable { collection: String },

    /// The completion service returned content that cannot be parsed into
    /// the expected persona structure during catalog bootstrap
    #[error("Initialization error: {message}")]
    Initialization { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn collection_unavailable(collection: impl Into<String>) -> Self {
        Self::CollectionUnavailable {
            collection: collection.into(),
        }
    }

    pub fn initialization(message: impl Into<String>) -> Self {
        Self::Initialization {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Whether this error came from an upstream service transport failure
    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::Provider { .. })
    }
}
