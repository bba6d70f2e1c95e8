use crate::embeddings::Embedder;
use crate::error::AnswerError;
use crate::traits::VectorIndex;
use tracing::debug;

pub const DEFAULT_TOP_K: usize = 5;

/// Embed the question and return the texts of the `top_k` nearest chunks in
/// the index's rank order. An empty collection yields an empty vec; callers
/// must treat that as "no relevant content" rather than answering anyway.
pub async fn retrieve_relevant_chunks(
    question: &str,
    collection: &str,
    embedder: &dyn Embedder,
    index: &dyn VectorIndex,
    top_k: usize,
) -> Result<Vec<String>, AnswerError> {
    let query_embedding = embedder.embed(question).await?;
    let hits = index.query(collection, &query_embedding, top_k).await?;

    debug!(collection = %collection, hit_count = hits.len(), "retrieved chunks");
    Ok(hits.into_iter().map(|hit| hit.text).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeddings::HashedNgramEmbedder;
    use crate::models::ChunkRecord;
    use crate::stores::InMemoryIndex;

    #[tokio::test]
    async fn empty_collection_retrieves_nothing() {
        let index = InMemoryIndex::new();
        let embedder = HashedNgramEmbedder::default();

        let chunks =
            retrieve_relevant_chunks("what is the term?", "doc_0", &embedder, &index, 5)
                .await
                .unwrap();
        assert!(chunks.is_empty());
    }

    #[tokio::test]
    async fn result_length_is_bounded_by_top_k() {
        let index = InMemoryIndex::new();
        let embedder = HashedNgramEmbedder::default();
        index.ensure_collection("doc_1", embedder.dimensions()).await.unwrap();

        let texts = ["confidential term", "governing law", "notice period", "purpose clause"];
        let mut records = Vec::new();
        for (position, text) in texts.iter().enumerate() {
            records.push(ChunkRecord {
                id: format!("chunk-{position}"),
                embedding: embedder.embed(text).await.unwrap(),
                text: text.to_string(),
            });
        }
        index.insert("doc_1", &records).await.unwrap();

        let chunks =
            retrieve_relevant_chunks("what is the term?", "doc_1", &embedder, &index, 2)
                .await
                .unwrap();
        assert_eq!(chunks.len(), 2);
    }

    #[tokio::test]
    async fn most_similar_chunk_ranks_first() {
        let index = InMemoryIndex::new();
        let embedder = HashedNgramEmbedder::default();
        index.ensure_collection("doc_2", embedder.dimensions()).await.unwrap();

        let records = vec![
            ChunkRecord {
                id: "chunk-0".to_string(),
                embedding: embedder.embed("the confidentiality term lasts two years").await.unwrap(),
                text: "the confidentiality term lasts two years".to_string(),
            },
            ChunkRecord {
                id: "chunk-1".to_string(),
                embedding: embedder.embed("zebra quartz unrelated").await.unwrap(),
                text: "zebra quartz unrelated".to_string(),
            },
        ];
        index.insert("doc_2", &records).await.unwrap();

        let chunks = retrieve_relevant_chunks(
            "how long does the confidentiality term last",
            "doc_2",
            &embedder,
            &index,
            1,
        )
        .await
        .unwrap();

        assert_eq!(chunks, vec!["the confidentiality term lasts two years".to_string()]);
    }
}
