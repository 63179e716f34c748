//! Read-only similarity search over an existing sqlite-vec knowledge base.
//!
//! The database holds a chunk table `{table}` and a `vec0` virtual table
//! `{table}_embeddings` keyed by the same rowid. Every column of the chunk row
//! becomes metadata, and a `metadata_json` (or `metadata`) column holding a
//! JSON object is flattened into the same map.

use std::path::Path;

use rusqlite::types::ValueRef;
use serde_json::{Map, Number, Value};
use tokio_rusqlite::Connection;
use tracing::{debug, info};

use crate::assistant::core::errors::{AssistantError, AssistantResult};
use crate::assistant::storage::sqlite_vec_loader::init_sqlite_vec_extension;
use crate::assistant::storage::vector_index::{IndexMatch, StoreFuture, VectorIndex};

const NESTED_METADATA_COLUMNS: [&str; 2] = ["metadata_json", "metadata"];

/// sqlite-vec backed knowledge index.
pub struct SqliteVecIndex {
    conn: Connection,
    table: String,
}

impl SqliteVecIndex {
    /// Open an existing knowledge base and check its tables are present.
    ///
    /// # Errors
    /// Returns an error if the table name is not a plain identifier, the
    /// database cannot be opened, or either table is missing.
    pub async fn open(path: &Path, table: &str) -> AssistantResult<Self> {
        if !is_identifier(table) {
            return Err(AssistantError::InvalidConfig(format!(
                "sqlite table name '{table}' must be alphanumeric or underscore"
            )));
        }
        init_sqlite_vec_extension();
        let conn = Connection::open(path).await?;

        let chunk_table = table.to_string();
        let embedding_table = format!("{table}_embeddings");
        let found = conn
            .call(move |conn| {
                let count: i64 = conn.query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE name IN (?1, ?2)",
                    rusqlite::params![chunk_table, embedding_table],
                    |row| row.get(0),
                )?;
                Ok(count)
            })
            .await?;
        if found < 2 {
            return Err(AssistantError::InvalidConfig(format!(
                "knowledge base {} is missing table '{table}' or '{table}_embeddings'",
                path.display()
            )));
        }

        info!("Opened sqlite-vec knowledge base {}", path.display());
        Ok(Self {
            conn,
            table: table.to_string(),
        })
    }
}

impl VectorIndex for SqliteVecIndex {
    fn search(
        &self,
        vector: Vec<f64>,
        top_k: usize,
    ) -> StoreFuture<'_, AssistantResult<Vec<IndexMatch>>> {
        Box::pin(async move {
            let query = serde_json::to_string(&vector)?;
            let k = i64::try_from(top_k).unwrap_or(i64::MAX);
            let table = self.table.clone();

            let matches = self
                .conn
                .call(move |conn| {
                    let sql = format!(
                        "WITH knn AS (
                             SELECT rowid, distance FROM {table}_embeddings
                             WHERE embedding MATCH ?1 AND k = ?2
                         )
                         SELECT c.*, knn.distance FROM knn
                         JOIN {table} c ON c.rowid = knn.rowid
                         ORDER BY knn.distance"
                    );
                    let mut stmt = conn.prepare(&sql)?;
                    let names: Vec<String> =
                        stmt.column_names().into_iter().map(String::from).collect();
                    let distance_index = names.len().saturating_sub(1);

                    let mut rows = stmt.query(rusqlite::params![query, k])?;
                    let mut matches = Vec::new();
                    while let Some(row) = rows.next()? {
                        let mut metadata = Map::new();
                        let mut nested = Vec::new();
                        for (index, name) in names.iter().enumerate().take(distance_index) {
                            let value = row.get_ref(index)?;
                            if NESTED_METADATA_COLUMNS.contains(&name.as_str()) {
                                if let ValueRef::Text(raw) = value {
                                    nested.push(raw.to_vec());
                                    continue;
                                }
                            }
                            if let Some(value) = to_json(value) {
                                metadata.insert(name.clone(), value);
                            }
                        }
                        for raw in nested {
                            flatten_into(&mut metadata, &raw);
                        }
                        let distance: Option<f64> = row.get(distance_index)?;
                        matches.push(IndexMatch {
                            metadata,
                            score: distance.map(|d| 1.0 - d),
                        });
                    }
                    Ok(matches)
                })
                .await?;

            debug!("sqlite-vec returned {} candidates", matches.len());
            Ok(matches)
        })
    }

    fn backend(&self) -> &'static str {
        "sqlite-vec"
    }
}

fn is_identifier(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn to_json(value: ValueRef<'_>) -> Option<Value> {
    match value {
        ValueRef::Null | ValueRef::Blob(_) => None,
        ValueRef::Integer(i) => Some(Value::Number(i.into())),
        ValueRef::Real(f) => Number::from_f64(f).map(Value::Number),
        ValueRef::Text(raw) => Some(Value::String(String::from_utf8_lossy(raw).into_owned())),
    }
}

/// Merge a JSON object into the row metadata. Row columns win on conflict.
fn flatten_into(metadata: &mut Map<String, Value>, raw: &[u8]) {
    if let Ok(Value::Object(nested)) = serde_json::from_slice::<Value>(raw) {
        for (key, value) in nested {
            metadata.entry(key).or_insert(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed(path: &Path) {
        init_sqlite_vec_extension();
        let conn = rusqlite::Connection::open(path).unwrap();
        conn.execute_batch(
            "CREATE TABLE sleep_chunks (id TEXT, content TEXT, metadata_json TEXT);
             CREATE VIRTUAL TABLE sleep_chunks_embeddings USING vec0(embedding float[3]);
             INSERT INTO sleep_chunks(rowid, id, content, metadata_json) VALUES
               (1, 'a', 'Keep a consistent wake time.', '{\"source\":\"guide.pdf\",\"page\":4}'),
               (2, 'b', 'Limit caffeine after noon.', NULL),
               (3, 'c', 'Unrelated chunk.', '{\"content\":\"ignored\"}');
             INSERT INTO sleep_chunks_embeddings(rowid, embedding) VALUES
               (1, '[1.0, 0.0, 0.0]'),
               (2, '[0.8, 0.2, 0.0]'),
               (3, '[0.0, 0.0, 1.0]');",
        )
        .unwrap();
    }

    #[tokio::test]
    async fn test_search_returns_nearest_with_flattened_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("knowledge.sqlite");
        seed(&path);

        let index = SqliteVecIndex::open(&path, "sleep_chunks").await.unwrap();
        let matches = index.search(vec![1.0, 0.0, 0.0], 2).await.unwrap();

        assert_eq!(matches.len(), 2);
        let first = &matches[0];
        assert_eq!(first.metadata["content"], "Keep a consistent wake time.");
        assert_eq!(first.metadata["source"], "guide.pdf");
        assert_eq!(first.metadata["page"], 4);
        assert!(!first.metadata.contains_key("metadata_json"));
        assert!((first.score.unwrap() - 1.0).abs() < 1e-6);
        assert_eq!(matches[1].metadata["id"], "b");
        assert!(matches[1].score.unwrap() < first.score.unwrap());
        assert_eq!(index.backend(), "sqlite-vec");
    }

    #[tokio::test]
    async fn test_row_columns_win_over_nested_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("knowledge.sqlite");
        seed(&path);

        let index = SqliteVecIndex::open(&path, "sleep_chunks").await.unwrap();
        let matches = index.search(vec![0.0, 0.0, 1.0], 1).await.unwrap();
        assert_eq!(matches[0].metadata["content"], "Unrelated chunk.");
    }

    #[tokio::test]
    async fn test_open_rejects_missing_tables() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.sqlite");
        let result = SqliteVecIndex::open(&path, "sleep_chunks").await;
        assert!(matches!(result, Err(AssistantError::InvalidConfig(_))));
    }

    #[tokio::test]
    async fn test_open_rejects_unsafe_table_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("knowledge.sqlite");
        let result = SqliteVecIndex::open(&path, "chunks; DROP TABLE x").await;
        assert!(matches!(result, Err(AssistantError::InvalidConfig(_))));
    }
}
