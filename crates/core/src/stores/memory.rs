use crate::error::AnswerError;
use crate::models::{ChunkRecord, ScoredChunk};
use crate::traits::VectorIndex;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// In-memory index using cosine similarity. Collections map a name to the
/// records inserted into them, in insertion order. Suitable for tests and
/// single-process deployments.
#[derive(Debug, Default)]
pub struct InMemoryIndex {
    collections: RwLock<HashMap<String, Vec<ChunkRecord>>>,
}

impl InMemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    f64::from(dot / (norm_a * norm_b))
}

#[async_trait]
impl VectorIndex for InMemoryIndex {
    async fn ensure_collection(&self, name: &str, _dimensions: usize) -> Result<(), AnswerError> {
        let mut collections = self.collections.write().await;
        collections.entry(name.to_string()).or_default();
        Ok(())
    }

    async fn count(&self, collection: &str) -> Result<usize, AnswerError> {
        let collections = self.collections.read().await;
        Ok(collections.get(collection).map(Vec::len).unwrap_or(0))
    }

    async fn insert(&self, collection: &str, records: &[ChunkRecord]) -> Result<(), AnswerError> {
        let mut collections = self.collections.write().await;
        let store = collections
            .get_mut(collection)
            .ok_or_else(|| AnswerError::Index(format!("collection '{collection}' does not exist")))?;
        store.extend_from_slice(records);
        Ok(())
    }

    async fn query(
        &self,
        collection: &str,
        vector: &[f32],
        top_k: usize,
    ) -> Result<Vec<ScoredChunk>, AnswerError> {
        let collections = self.collections.read().await;
        let Some(store) = collections.get(collection) else {
            return Ok(Vec::new());
        };

        let mut scored: Vec<ScoredChunk> = store
            .iter()
            .map(|record| ScoredChunk {
                id: record.id.clone(),
                text: record.text.clone(),
                score: cosine_similarity(&record.embedding, vector),
            })
            .collect();

        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(top_k);
        Ok(scored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, embedding: Vec<f32>, text: &str) -> ChunkRecord {
        ChunkRecord {
            id: id.to_string(),
            embedding,
            text: text.to_string(),
        }
    }

    #[tokio::test]
    async fn query_on_missing_collection_is_empty() {
        let index = InMemoryIndex::new();
        let hits = index.query("nowhere", &[1.0, 0.0], 5).await.unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn query_ranks_by_cosine_similarity() {
        let index = InMemoryIndex::new();
        index.ensure_collection("doc_1", 2).await.unwrap();
        index
            .insert(
                "doc_1",
                &[
                    record("chunk-0", vec![0.0, 1.0], "orthogonal"),
                    record("chunk-1", vec![1.0, 0.0], "aligned"),
                    record("chunk-2", vec![1.0, 1.0], "diagonal"),
                ],
            )
            .await
            .unwrap();

        let hits = index.query("doc_1", &[1.0, 0.0], 2).await.unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].id, "chunk-1");
        assert_eq!(hits[1].id, "chunk-2");
        assert!(hits[0].score > hits[1].score);
    }

    #[tokio::test]
    async fn count_tracks_inserts() {
        let index = InMemoryIndex::new();
        index.ensure_collection("doc_2", 2).await.unwrap();
        assert_eq!(index.count("doc_2").await.unwrap(), 0);

        index
            .insert("doc_2", &[record("chunk-0", vec![1.0, 0.0], "text")])
            .await
            .unwrap();
        assert_eq!(index.count("doc_2").await.unwrap(), 1);
    }
}
