use crate::embeddings::Embedder;
use crate::error::AnswerError;
use crate::models::{ChunkRecord, IndexReport};
use crate::traits::VectorIndex;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

const COLLECTION_BUCKETS: u64 = 1_000_000;

/// Derive the collection name for a document id (its base filename).
/// SHA-256 reduced to a bounded bucket; stable across processes. Distinct
/// filenames can collide and then share a collection; this is a documented
/// limitation, not a cryptographic identity.
pub fn collection_name_for(document_id: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(document_id.as_bytes());
    let digest = hasher.finalize();

    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    let bucket = u64::from_be_bytes(prefix) % COLLECTION_BUCKETS;

    format!("doc_{bucket}")
}

/// Writes a document's chunks into its collection exactly once. A collection
/// that already holds records is left untouched, so edits to an
/// already-indexed document under the same filename are not picked up.
pub struct Indexer {
    embedder: Arc<dyn Embedder>,
    index: Arc<dyn VectorIndex>,
    // The count==0 guard is read-then-act; per-collection advisory locks keep
    // concurrent first-time indexing of one document from double-inserting.
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl Indexer {
    pub fn new(embedder: Arc<dyn Embedder>, index: Arc<dyn VectorIndex>) -> Self {
        Self {
            embedder,
            index,
            locks: Mutex::new(HashMap::new()),
        }
    }

    async fn collection_lock(&self, collection: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        locks
            .entry(collection.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Index `chunks` under the collection derived from `document_id`.
    /// Idempotent per document id: a populated collection is skipped.
    /// Embedding and storage failures propagate to the caller.
    pub async fn index_document(
        &self,
        document_id: &str,
        chunks: &[String],
    ) -> Result<IndexReport, AnswerError> {
        let collection = collection_name_for(document_id);
        let lock = self.collection_lock(&collection).await;
        let _guard = lock.lock().await;

        self.index
            .ensure_collection(&collection, self.embedder.dimensions())
            .await?;

        let existing = self.index.count(&collection).await?;
        if existing > 0 {
            info!(collection = %collection, existing, "document already indexed, skipping");
            return Ok(IndexReport {
                collection,
                inserted: 0,
                existing,
            });
        }

        let embeddings = self.embedder.embed_batch(chunks).await?;
        let records: Vec<ChunkRecord> = chunks
            .iter()
            .zip(embeddings)
            .enumerate()
            .map(|(position, (text, embedding))| ChunkRecord {
                id: format!("chunk-{position}"),
                embedding,
                text: text.clone(),
            })
            .collect();

        self.index.insert(&collection, &records).await?;
        info!(collection = %collection, inserted = records.len(), "indexed document chunks");

        Ok(IndexReport {
            inserted: records.len(),
            existing: 0,
            collection,
        })
    }
}
