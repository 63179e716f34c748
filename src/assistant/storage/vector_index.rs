//! Vector index seam shared by the sqlite-vec, Pinecone and MongoDB backends.

use std::future::Future;
use std::pin::Pin;

use serde_json::{Map, Value};

use crate::assistant::core::errors::AssistantResult;

/// Boxed future type for vector index operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// One candidate returned by a similarity search.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct IndexMatch {
    /// Backend-specific metadata; field names vary between backends.
    pub metadata: Map<String, Value>,
    /// Backend-defined similarity score.
    pub score: Option<f64>,
}

/// Similarity search over an existing index.
pub trait VectorIndex: Send + Sync {
    /// Return up to `top_k` candidates ordered as the backend ranks them.
    ///
    /// # Errors
    /// Returns an error if the backend cannot be queried.
    fn search(
        &self,
        vector: Vec<f64>,
        top_k: usize,
    ) -> StoreFuture<'_, AssistantResult<Vec<IndexMatch>>>;

    /// Short backend label for logs.
    fn backend(&self) -> &'static str;
}
