use crate::error::AnswerError;
use crate::models::{ChunkRecord, ScoredChunk};
use async_trait::async_trait;

/// Persistent store of (id, vector, text) records grouped into named
/// collections, with nearest-neighbor query. Ranking and tie-breaking are
/// owned by the backend.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Open or create a named collection. No-op when it already exists.
    async fn ensure_collection(&self, name: &str, dimensions: usize) -> Result<(), AnswerError>;

    /// Number of records currently stored in the collection.
    async fn count(&self, collection: &str) -> Result<usize, AnswerError>;

    /// Append records to the collection.
    async fn insert(&self, collection: &str, records: &[ChunkRecord]) -> Result<(), AnswerError>;

    /// The `top_k` records nearest to `vector`, ordered by decreasing
    /// similarity. An empty collection yields an empty vec.
    async fn query(
        &self,
        collection: &str,
        vector: &[f32],
        top_k: usize,
    ) -> Result<Vec<ScoredChunk>, AnswerError>;
}
