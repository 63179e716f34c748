//! Knowledge retrieval: embed the query, search the index, keep usable snippets.

use std::sync::Arc;

use tracing::{debug, info};

use crate::assistant::core::errors::{AssistantError, AssistantResult};
use crate::assistant::core::snippet::RetrievedSnippet;
use crate::assistant::embedding::embedder::Embedder;
use crate::assistant::retrieval::metadata::{extract_page, extract_source, extract_text};
use crate::assistant::retrieval::query::build_query_text;
use crate::assistant::state::conversation::ConversationState;
use crate::assistant::storage::vector_index::{IndexMatch, VectorIndex};

/// Retrieves reference snippets for a query.
#[derive(Clone)]
pub struct KnowledgeRetriever {
    embedder: Arc<dyn Embedder>,
    index: Arc<dyn VectorIndex>,
    top_k: usize,
    query_turns: usize,
}

impl KnowledgeRetriever {
    /// Create a retriever.
    #[must_use]
    pub fn new(
        embedder: Arc<dyn Embedder>,
        index: Arc<dyn VectorIndex>,
        top_k: usize,
        query_turns: usize,
    ) -> Self {
        Self {
            embedder,
            index,
            top_k,
            query_turns,
        }
    }

    /// Retrieve snippets for the recent user-history window of `state`.
    ///
    /// # Errors
    /// Returns an error if embedding or search fails.
    pub async fn retrieve_for(
        &self,
        state: &ConversationState,
    ) -> AssistantResult<Vec<RetrievedSnippet>> {
        match build_query_text(state, self.query_turns) {
            Some(query) => self.retrieve(&query, self.top_k).await,
            None => Ok(Vec::new()),
        }
    }

    /// Retrieve up to `top_k` snippets for `query`, in index order.
    ///
    /// An empty query or an empty embedding yields no snippets. Candidates
    /// without extractable text are dropped.
    ///
    /// # Errors
    /// Returns an error if embedding or search fails, or if the embedding
    /// length differs from the embedder's configured dimensions.
    pub async fn retrieve(
        &self,
        query: &str,
        top_k: usize,
    ) -> AssistantResult<Vec<RetrievedSnippet>> {
        let query = query.trim();
        if query.is_empty() || top_k == 0 {
            return Ok(Vec::new());
        }

        let vector = self.embedder.embed_text(query).await?;
        if vector.is_empty() {
            debug!("Embedding for query was empty; skipping search");
            return Ok(Vec::new());
        }
        let expected = self.embedder.ndims();
        if vector.len() != expected {
            return Err(AssistantError::DimensionMismatch {
                expected,
                actual: vector.len(),
            });
        }

        let candidates = self.index.search(vector, top_k).await?;
        let total = candidates.len();
        let snippets: Vec<RetrievedSnippet> =
            candidates.into_iter().filter_map(to_snippet).collect();
        info!(
            "Retrieved {} snippets from {} ({} candidates)",
            snippets.len(),
            self.index.backend(),
            total
        );
        Ok(snippets)
    }
}

fn to_snippet(candidate: IndexMatch) -> Option<RetrievedSnippet> {
    let text = extract_text(&candidate.metadata)?;
    Some(RetrievedSnippet {
        text,
        source_document: extract_source(&candidate.metadata),
        page_number: extract_page(&candidate.metadata),
        score: candidate.score,
    })
}
