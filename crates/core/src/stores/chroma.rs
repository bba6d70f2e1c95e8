use crate::error::AnswerError;
use crate::models::{ChunkRecord, ScoredChunk};
use crate::traits::VectorIndex;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Vector index backed by a Chroma server over its REST API. Collection
/// names are resolved to server-side ids once and cached.
pub struct ChromaIndex {
    endpoint: String,
    client: Client,
    collection_ids: RwLock<HashMap<String, String>>,
}

impl ChromaIndex {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            client: Client::new(),
            collection_ids: RwLock::new(HashMap::new()),
        }
    }

    async fn collection_id(&self, name: &str) -> Result<String, AnswerError> {
        if let Some(id) = self.collection_ids.read().await.get(name) {
            return Ok(id.clone());
        }

        let response = self
            .client
            .post(format!("{}/api/v1/collections", self.endpoint))
            .json(&json!({ "name": name, "get_or_create": true }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AnswerError::BackendResponse {
                backend: "chroma".to_string(),
                details: response.status().to_string(),
            });
        }

        let parsed: Value = response.json().await?;
        let id = parsed
            .pointer("/id")
            .and_then(Value::as_str)
            .ok_or_else(|| AnswerError::BackendResponse {
                backend: "chroma".to_string(),
                details: "collection response missing id".to_string(),
            })?
            .to_string();

        self.collection_ids
            .write()
            .await
            .insert(name.to_string(), id.clone());
        Ok(id)
    }
}

#[async_trait]
impl VectorIndex for ChromaIndex {
    async fn ensure_collection(&self, name: &str, _dimensions: usize) -> Result<(), AnswerError> {
        self.collection_id(name).await.map(|_| ())
    }

    async fn count(&self, collection: &str) -> Result<usize, AnswerError> {
        let id = self.collection_id(collection).await?;
        let response = self
            .client
            .get(format!("{}/api/v1/collections/{}/count", self.endpoint, id))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AnswerError::BackendResponse {
                backend: "chroma".to_string(),
                details: response.status().to_string(),
            });
        }

        let parsed: Value = response.json().await?;
        parsed
            .as_u64()
            .map(|count| count as usize)
            .ok_or_else(|| AnswerError::BackendResponse {
                backend: "chroma".to_string(),
                details: "count response was not an integer".to_string(),
            })
    }

    async fn insert(&self, collection: &str, records: &[ChunkRecord]) -> Result<(), AnswerError> {
        if records.is_empty() {
            return Ok(());
        }

        let id = self.collection_id(collection).await?;
        let ids: Vec<&str> = records.iter().map(|record| record.id.as_str()).collect();
        let embeddings: Vec<&[f32]> = records.iter().map(|record| record.embedding.as_slice()).collect();
        let documents: Vec<&str> = records.iter().map(|record| record.text.as_str()).collect();

        let response = self
            .client
            .post(format!("{}/api/v1/collections/{}/add", self.endpoint, id))
            .json(&json!({
                "ids": ids,
                "embeddings": embeddings,
                "documents": documents,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AnswerError::BackendResponse {
                backend: "chroma".to_string(),
                details: response.status().to_string(),
            });
        }

        Ok(())
    }

    async fn query(
        &self,
        collection: &str,
        vector: &[f32],
        top_k: usize,
    ) -> Result<Vec<ScoredChunk>, AnswerError> {
        let id = self.collection_id(collection).await?;
        let response = self
            .client
            .post(format!("{}/api/v1/collections/{}/query", self.endpoint, id))
            .json(&json!({
                "query_embeddings": [vector],
                "n_results": top_k,
                "include": ["documents", "distances"],
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AnswerError::BackendResponse {
                backend: "chroma".to_string(),
                details: response.status().to_string(),
            });
        }

        let parsed: Value = response.json().await?;
        Ok(parse_query_response(&parsed))
    }
}

/// Chroma answers per-query arrays-of-arrays; the first row belongs to the
/// single query vector we sent. Distances become similarity as `1 - d`.
fn parse_query_response(parsed: &Value) -> Vec<ScoredChunk> {
    let ids = parsed
        .pointer("/ids/0")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    let documents = parsed
        .pointer("/documents/0")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    let distances = parsed
        .pointer("/distances/0")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    let mut hits = Vec::new();
    for (position, id) in ids.iter().enumerate() {
        let id = id.as_str().unwrap_or_default().to_string();
        let text = documents
            .get(position)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let score = distances
            .get(position)
            .and_then(Value::as_f64)
            .map(|distance| 1.0 - distance)
            .unwrap_or(0.0);

        hits.push(ScoredChunk { id, text, score });
    }

    hits
}

#[cfg(test)]
mod tests {
    use super::parse_query_response;
    use serde_json::json;

    #[test]
    fn query_response_rows_map_to_scored_chunks() {
        let payload = json!({
            "ids": [["chunk-0", "chunk-3"]],
            "documents": [["first text", "second text"]],
            "distances": [[0.1, 0.4]],
        });

        let hits = parse_query_response(&payload);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].id, "chunk-0");
        assert_eq!(hits[0].text, "first text");
        assert!(hits[0].score > hits[1].score);
    }

    #[test]
    fn empty_query_response_yields_no_hits() {
        let payload = json!({ "ids": [[]], "documents": [[]], "distances": [[]] });
        assert!(parse_query_response(&payload).is_empty());
    }
}
