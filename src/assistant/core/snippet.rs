//! Knowledge snippets returned by retrieval.

use serde::{Deserialize, Serialize};

/// A reference passage with optional provenance and similarity score.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RetrievedSnippet {
    /// Passage text, never blank.
    pub text: String,
    /// Source document name, when the index provides one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_document: Option<String>,
    /// Page identifier, when the index provides one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_number: Option<String>,
    /// Backend-defined similarity score.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl RetrievedSnippet {
    /// Create a snippet with text only.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source_document: None,
            page_number: None,
            score: None,
        }
    }

    /// Attach a source document.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source_document = Some(source.into());
        self
    }

    /// Attach a page identifier.
    #[must_use]
    pub fn with_page(mut self, page: impl Into<String>) -> Self {
        self.page_number = Some(page.into());
        self
    }

    /// Attach a similarity score.
    #[must_use]
    pub const fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }

    /// Citation label built from whichever provenance fields are present.
    ///
    /// Returns `None` when the snippet carries no provenance at all.
    #[must_use]
    pub fn citation_label(&self) -> Option<String> {
        let mut parts = Vec::with_capacity(2);
        if let Some(source) = &self.source_document {
            parts.push(format!("Source: {source}"));
        }
        if let Some(page) = &self.page_number {
            parts.push(format!("Page: {page}"));
        }
        if parts.is_empty() {
            None
        } else {
            Some(format!("[{}]", parts.join(", ")))
        }
    }
}
