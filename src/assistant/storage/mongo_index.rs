//! MongoDB Atlas collection searched through the `$vectorSearch` aggregation stage.

use std::time::Duration;

use mongodb::bson::{Bson, Document, doc};
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection};
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::assistant::core::errors::AssistantResult;
use crate::assistant::storage::vector_index::{IndexMatch, StoreFuture, VectorIndex};

const SERVER_SELECTION_TIMEOUT: Duration = Duration::from_secs(5);
const CANDIDATES_PER_RESULT: usize = 10;
const SCORE_FIELD: &str = "score";

/// Where the chunks live and how the Atlas index is named.
#[derive(Clone, Debug)]
pub struct MongoTarget<'a> {
    /// Database name.
    pub database: &'a str,
    /// Collection name.
    pub collection: &'a str,
    /// Atlas vector search index name.
    pub index_name: &'a str,
    /// Field holding the embedding.
    pub embedding_path: &'a str,
}

/// MongoDB Atlas knowledge index.
pub struct MongoIndex {
    collection: Collection<Document>,
    index_name: String,
    embedding_path: String,
}

impl MongoIndex {
    /// Connect to the cluster and confirm it answers a `ping`.
    ///
    /// # Errors
    /// Returns an error if the URI is malformed or the cluster is unreachable.
    pub async fn connect(
        uri: &str,
        app_name: Option<&str>,
        target: MongoTarget<'_>,
    ) -> AssistantResult<Self> {
        let mut options = ClientOptions::parse(uri).await?;
        options.server_selection_timeout = Some(SERVER_SELECTION_TIMEOUT);
        if let Some(name) = app_name {
            options.app_name = Some(name.to_string());
        }
        let client = Client::with_options(options)?;
        client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await?;
        info!("Connected to MongoDB cluster at '{}'", redact_credentials(uri));

        Ok(Self {
            collection: client
                .database(target.database)
                .collection::<Document>(target.collection),
            index_name: target.index_name.to_string(),
            embedding_path: target.embedding_path.to_string(),
        })
    }
}

impl VectorIndex for MongoIndex {
    fn search(
        &self,
        vector: Vec<f64>,
        top_k: usize,
    ) -> StoreFuture<'_, AssistantResult<Vec<IndexMatch>>> {
        Box::pin(async move {
            let pipeline = search_pipeline(&self.index_name, &self.embedding_path, vector, top_k);
            let mut cursor = self.collection.aggregate(pipeline).await?;
            let mut matches = Vec::with_capacity(top_k);
            while cursor.advance().await? {
                let document = cursor.deserialize_current()?;
                matches.push(document_to_match(document, &self.embedding_path));
            }
            debug!("MongoDB returned {} candidates", matches.len());
            Ok(matches)
        })
    }

    fn backend(&self) -> &'static str {
        "mongodb"
    }
}

/// Build the aggregation: vector search, expose the score, drop the embedding.
fn search_pipeline(
    index_name: &str,
    embedding_path: &str,
    vector: Vec<f64>,
    top_k: usize,
) -> Vec<Document> {
    let limit = i64::try_from(top_k).unwrap_or(i64::MAX);
    let candidates =
        i64::try_from(top_k.saturating_mul(CANDIDATES_PER_RESULT)).unwrap_or(i64::MAX);
    vec![
        doc! {
            "$vectorSearch": {
                "index": index_name,
                "path": embedding_path,
                "queryVector": vector,
                "numCandidates": candidates,
                "limit": limit,
            }
        },
        doc! { "$set": { "score": { "$meta": "vectorSearchScore" } } },
        doc! { "$unset": embedding_path },
    ]
}

/// Turn one result document into an index match.
///
/// Fields of a nested `metadata` document are lifted to the top level;
/// top-level fields win on conflict.
fn document_to_match(mut document: Document, embedding_path: &str) -> IndexMatch {
    document.remove("_id");
    document.remove(embedding_path);
    let score = match document.remove(SCORE_FIELD) {
        Some(Bson::Double(score)) => Some(score),
        Some(Bson::Int32(score)) => Some(f64::from(score)),
        _ => None,
    };
    let nested = match document.remove("metadata") {
        Some(Bson::Document(nested)) => Some(nested),
        _ => None,
    };

    let mut metadata = Map::new();
    if let Some(nested) = nested {
        metadata.extend(to_json_map(nested));
    }
    metadata.extend(to_json_map(document));

    IndexMatch { metadata, score }
}

fn to_json_map(document: Document) -> Map<String, Value> {
    match Bson::Document(document).into_relaxed_extjson() {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Strip user info from a connection string for logging.
fn redact_credentials(uri: &str) -> &str {
    uri.rsplit_once('@').map_or(uri, |(_, host)| host)
}
