use crate::error::AnswerError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT: usize = 128;

pub const DEFAULT_EMBEDDING_DIMENSIONS: usize = DEFAULT;

/// Maps text to fixed-length vectors. Deterministic for the same model
/// version; dimensionality is fixed per instance.
#[async_trait]
pub trait Embedder: Send + Sync {
    fn dimensions(&self) -> usize;

    async fn embed(&self, text: &str) -> Result<Vec<f32>, AnswerError>;

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, AnswerError>;
}

/// In-process embedder hashing character trigrams into a fixed-dimension
/// L2-normalized vector. No model download, fully deterministic.
#[derive(Debug, Clone, Copy)]
pub struct HashedNgramEmbedder {
    pub dimensions: usize,
}

impl Default for HashedNgramEmbedder {
    fn default() -> Self {
        Self {
            dimensions: DEFAULT_EMBEDDING_DIMENSIONS,
        }
    }
}

impl HashedNgramEmbedder {
    fn embed_sync(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0f32; self.dimensions.max(1)];
        let lowered = text.to_lowercase();
        let chars: Vec<char> = lowered.chars().collect();

        if chars.is_empty() {
            return vector;
        }

        for window in chars.windows(3) {
            let token = window.iter().collect::<String>();
            let mut hash = 1469598103934665603u64;
            for byte in token.bytes() {
                hash ^= byte as u64;
                hash = hash.wrapping_mul(1099511628211);
            }
            let bucket = (hash % vector.len() as u64) as usize;
            vector[bucket] += 1.0;
        }

        let magnitude = vector.iter().map(|value| value * value).sum::<f32>().sqrt();
        if magnitude > 0.0 {
            for value in &mut vector {
                *value /= magnitude;
            }
        }

        vector
    }
}

#[async_trait]
impl Embedder for HashedNgramEmbedder {
    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, AnswerError> {
        Ok(self.embed_sync(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, AnswerError> {
        Ok(texts.iter().map(|text| self.embed_sync(text)).collect())
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
enum RemoteEmbeddingRequest<'a> {
    Single { model: &'a str, input: &'a str },
    Batch { model: &'a str, input: &'a [String] },
}

#[derive(Debug, Deserialize)]
struct RemoteEmbeddingResponse {
    #[serde(default)]
    embedding: Option<Vec<f32>>,
    #[serde(default)]
    embeddings: Option<Vec<Vec<f32>>>,
}

#[derive(Debug, Clone)]
pub struct RemoteEmbedderConfig {
    pub endpoint: String,
    pub model: String,
    pub dimensions: usize,
    pub timeout: Duration,
}

/// Embedder backed by an HTTP embedding server (Ollama-compatible `/api/embed`
/// shape). Requests are bounded by the configured timeout.
pub struct RemoteEmbedder {
    client: reqwest::Client,
    config: RemoteEmbedderConfig,
}

impl RemoteEmbedder {
    pub fn new(config: RemoteEmbedderConfig) -> Result<Self, AnswerError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|error| AnswerError::Embedding(error.to_string()))?;

        Ok(Self { client, config })
    }

    async fn request(
        &self,
        payload: &RemoteEmbeddingRequest<'_>,
    ) -> Result<RemoteEmbeddingResponse, AnswerError> {
        let response = self
            .client
            .post(format!("{}/api/embed", self.config.endpoint))
            .json(payload)
            .send()
            .await
            .map_err(|error| AnswerError::Embedding(error.to_string()))?;

        if !response.status().is_success() {
            return Err(AnswerError::Embedding(format!(
                "embedding server returned {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|error| AnswerError::Embedding(error.to_string()))
    }
}

#[async_trait]
impl Embedder for RemoteEmbedder {
    fn dimensions(&self) -> usize {
        self.config.dimensions
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, AnswerError> {
        let payload = RemoteEmbeddingRequest::Single {
            model: &self.config.model,
            input: text,
        };
        let parsed = self.request(&payload).await?;

        if let Some(embedding) = parsed.embedding {
            return Ok(embedding);
        }
        parsed
            .embeddings
            .and_then(|mut batch| if batch.is_empty() { None } else { Some(batch.remove(0)) })
            .ok_or_else(|| AnswerError::Embedding("no embedding in server response".to_string()))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, AnswerError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let payload = RemoteEmbeddingRequest::Batch {
            model: &self.config.model,
            input: texts,
        };
        let parsed = self.request(&payload).await?;

        let embeddings = parsed
            .embeddings
            .or_else(|| parsed.embedding.map(|single| vec![single]))
            .ok_or_else(|| AnswerError::Embedding("no embeddings in server response".to_string()))?;

        if embeddings.len() != texts.len() {
            return Err(AnswerError::Embedding(format!(
                "embedding count {} does not match input count {}",
                embeddings.len(),
                texts.len()
            )));
        }

        Ok(embeddings)
    }
}

#[cfg(test)]
mod tests {
    use super::{Embedder, HashedNgramEmbedder};

    #[tokio::test]
    async fn embedder_is_deterministic() {
        let embedder = HashedNgramEmbedder::default();
        let first = embedder.embed("the receiving party shall").await.unwrap();
        let second = embedder.embed("the receiving party shall").await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn embedder_outputs_expected_length() {
        let embedder = HashedNgramEmbedder { dimensions: 32 };
        let vector = embedder.embed("abc").await.unwrap();
        assert_eq!(vector.len(), 32);
    }

    #[tokio::test]
    async fn batch_matches_single_embeddings() {
        let embedder = HashedNgramEmbedder::default();
        let texts = vec!["first chunk".to_string(), "second chunk".to_string()];
        let batch = embedder.embed_batch(&texts).await.unwrap();

        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0], embedder.embed("first chunk").await.unwrap());
        assert_eq!(batch[1], embedder.embed("second chunk").await.unwrap());
    }
}
