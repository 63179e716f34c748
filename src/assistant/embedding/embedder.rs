//! Embedding model wrapper for Rig + Ollama.

use std::future::Future;
use std::pin::Pin;

use reqwest::Client as ReqwestClient;
use rig::client::EmbeddingsClient;
use rig::embeddings::EmbeddingModel;
use rig::providers::ollama;

use crate::assistant::core::config::{EmbeddingConfig, LlmConfig};
use crate::assistant::core::errors::{AssistantError, AssistantResult};
use crate::assistant::llm::generator::ollama_client;

/// Boxed future type for embedder operations.
pub type EmbedFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Trait abstraction over embedding models.
pub trait Embedder: Send + Sync {
    /// Embed a single text string into an ordered vector of floats.
    ///
    /// # Errors
    /// Returns an error if the embedding request fails.
    fn embed_text(&self, text: &str) -> EmbedFuture<'_, AssistantResult<Vec<f64>>>;
    /// Return embedding dimensionality.
    fn ndims(&self) -> usize;
}

type OllamaEmbeddingModel = ollama::EmbeddingModel<ReqwestClient>;

/// Ollama embedder using the Rig provider.
#[derive(Clone)]
pub struct OllamaEmbedder {
    model: OllamaEmbeddingModel,
    ndims: usize,
}

impl OllamaEmbedder {
    /// Create a new Ollama embedder. The embedding model is served by the same
    /// Ollama instance as the chat model.
    ///
    /// # Errors
    /// Returns an error if the client cannot be built.
    pub fn new(llm: &LlmConfig, config: &EmbeddingConfig) -> AssistantResult<Self> {
        let client = ollama_client(&llm.base_url)?;
        let model = client.embedding_model_with_ndims(config.model.clone(), config.ndims);
        Ok(Self {
            model,
            ndims: config.ndims,
        })
    }
}

impl Embedder for OllamaEmbedder {
    fn embed_text(&self, text: &str) -> EmbedFuture<'_, AssistantResult<Vec<f64>>> {
        let text = text.to_string();
        Box::pin(async move {
            let embedding = self
                .model
                .embed_text(&text)
                .await
                .map_err(AssistantError::Embedding)?;
            Ok(embedding.vec)
        })
    }

    fn ndims(&self) -> usize {
        self.ndims
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedder_reports_configured_dims() {
        let config = EmbeddingConfig {
            model: "nomic-embed-text".to_string(),
            ndims: 384,
        };
        let embedder = OllamaEmbedder::new(&LlmConfig::default(), &config).unwrap();
        assert_eq!(embedder.ndims(), 384);
    }
}
