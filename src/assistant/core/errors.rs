//! Error types for the assistant core and its collaborators.

use thiserror::Error;

/// Fixed notice shown to users when a turn fails for infrastructure reasons.
pub const GENERIC_FAILURE_NOTICE: &str =
    "The assistant ran into an unexpected issue. Please try again in a moment.";

/// Assistant error type.
#[derive(Debug, Error)]
pub enum AssistantError {
    /// Invalid configuration or missing required settings.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// A collaborator could not be reached in time.
    #[error("collaborator unavailable: {0}")]
    Unavailable(String),
    /// Completion error from Rig.
    #[error("completion error: {0}")]
    Completion(#[from] rig::completion::CompletionError),
    /// Embedding error from Rig.
    #[error("embedding error: {0}")]
    Embedding(#[from] rig::embeddings::EmbeddingError),
    /// HTTP client error from Rig.
    #[error("http client error: {0}")]
    HttpClient(#[from] rig::http_client::Error),
    /// HTTP error talking to a vector index or model endpoint.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    /// Vector index answered with a non-success status.
    #[error("{backend} backend returned status {status}")]
    Backend {
        /// Backend label.
        backend: &'static str,
        /// HTTP status code.
        status: u16,
    },
    /// MongoDB driver error.
    #[error("mongodb error: {0}")]
    Mongo(#[from] mongodb::error::Error),
    /// `SQLite` error (sync).
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// `SQLite` error (async).
    #[error("tokio-rusqlite error: {0}")]
    TokioSqlite(#[from] tokio_rusqlite::Error),
    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// URL parse error.
    #[error("url parse error: {0}")]
    Url(#[from] url::ParseError),
    /// Regex compilation error.
    #[error("regex error: {0}")]
    Regex(#[from] regex::Error),
    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Embedding length differs from the configured dimensionality.
    #[error("embedding has {actual} dimensions, expected {expected}")]
    DimensionMismatch {
        /// Configured dimensions.
        expected: usize,
        /// Dimensions actually returned.
        actual: usize,
    },
    /// Logging could not be installed.
    #[error("logging error: {0}")]
    Logging(String),
}

impl AssistantError {
    /// Whether the error comes from an external collaborator (model, embedder, index).
    ///
    /// Configuration and logging errors are operator mistakes rather than
    /// collaborator failures.
    #[must_use]
    pub const fn is_collaborator_failure(&self) -> bool {
        !matches!(
            self,
            Self::InvalidConfig(_)
                | Self::DimensionMismatch { .. }
                | Self::Logging(_)
                | Self::Regex(_)
                | Self::Url(_)
        )
    }
}

/// Convenience result alias for assistant operations.
pub type AssistantResult<T> = Result<T, AssistantError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_error_display() {
        let err = AssistantError::Backend {
            backend: "pinecone",
            status: 503,
        };
        assert_eq!(err.to_string(), "pinecone backend returned status 503");
    }

    #[test]
    fn test_collaborator_failure_classification() {
        assert!(AssistantError::Unavailable("ollama".to_string()).is_collaborator_failure());
        assert!(
            AssistantError::Backend {
                backend: "sqlite-vec",
                status: 500
            }
            .is_collaborator_failure()
        );
        assert!(!AssistantError::InvalidConfig("top_k".to_string()).is_collaborator_failure());
        assert!(!AssistantError::Logging("twice".to_string()).is_collaborator_failure());
        assert!(
            !AssistantError::DimensionMismatch {
                expected: 768,
                actual: 384
            }
            .is_collaborator_failure()
        );
    }
}
