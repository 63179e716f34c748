//! Embedding seam.

pub mod embedder;

pub use embedder::{EmbedFuture, Embedder, OllamaEmbedder};
