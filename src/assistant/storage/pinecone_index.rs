//! Pinecone serverless index over its REST data-plane API.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::assistant::core::config::normalize_host;
use crate::assistant::core::errors::{AssistantError, AssistantResult};
use crate::assistant::storage::vector_index::{IndexMatch, StoreFuture, VectorIndex};

const API_VERSION: &str = "2024-07";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    vector: &'a [f64],
    top_k: usize,
    include_metadata: bool,
    include_values: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    namespace: Option<&'a str>,
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<QueryMatch>,
}

#[derive(Deserialize)]
struct QueryMatch {
    #[serde(default)]
    score: Option<f64>,
    #[serde(default)]
    metadata: Option<Map<String, Value>>,
}

/// Pinecone-backed knowledge index.
pub struct PineconeIndex {
    client: Client,
    host: String,
    api_key: String,
    namespace: Option<String>,
}

impl PineconeIndex {
    /// Create a client for the index at `host`.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(host: &str, api_key: &str, namespace: Option<String>) -> AssistantResult<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            host: normalize_host(host),
            api_key: api_key.to_string(),
            namespace: namespace.filter(|ns| !ns.is_empty()),
        })
    }

    /// Confirm the index is reachable and the key is accepted.
    ///
    /// # Errors
    /// Returns an error if the stats endpoint does not answer with success.
    pub async fn verify(&self) -> AssistantResult<()> {
        let response = self
            .client
            .post(format!("{}/describe_index_stats", self.host))
            .header("Api-Key", &self.api_key)
            .header("X-Pinecone-API-Version", API_VERSION)
            .json(&serde_json::json!({}))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(AssistantError::Backend {
                backend: "pinecone",
                status: response.status().as_u16(),
            });
        }
        info!("Connected to Pinecone index at {}", self.host);
        Ok(())
    }
}

impl VectorIndex for PineconeIndex {
    fn search(
        &self,
        vector: Vec<f64>,
        top_k: usize,
    ) -> StoreFuture<'_, AssistantResult<Vec<IndexMatch>>> {
        Box::pin(async move {
            let body = QueryRequest {
                vector: &vector,
                top_k,
                include_metadata: true,
                include_values: false,
                namespace: self.namespace.as_deref(),
            };
            let response = self
                .client
                .post(format!("{}/query", self.host))
                .header("Api-Key", &self.api_key)
                .header("X-Pinecone-API-Version", API_VERSION)
                .json(&body)
                .send()
                .await?;
            if !response.status().is_success() {
                return Err(AssistantError::Backend {
                    backend: "pinecone",
                    status: response.status().as_u16(),
                });
            }

            let parsed: QueryResponse = response.json().await?;
            debug!("Pinecone returned {} candidates", parsed.matches.len());
            Ok(parsed
                .matches
                .into_iter()
                .map(|m| IndexMatch {
                    metadata: m.metadata.unwrap_or_default(),
                    score: m.score,
                })
                .collect())
        })
    }

    fn backend(&self) -> &'static str {
        "pinecone"
    }
}
