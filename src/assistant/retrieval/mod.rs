//! Knowledge retrieval over the configured vector index.

pub mod metadata;
pub mod query;
pub mod retriever;

pub use metadata::{extract_page, extract_source, extract_text};
pub use query::build_query_text;
pub use retriever::KnowledgeRetriever;
