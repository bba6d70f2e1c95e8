use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A loaded document: raw source location plus its extracted plain text.
/// Immutable once constructed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadedDocument {
    pub file_name: String,
    pub source_path: String,
    pub text: String,
    pub loaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Pdf => "pdf",
            DocumentKind::Docx => "docx",
        }
    }
}

/// An entry discovered while scanning an upload folder.
#[derive(Debug, Clone)]
pub struct DiscoveredDocument {
    pub path: PathBuf,
    pub kind: DocumentKind,
    pub size_bytes: u64,
}

/// One stored record in a collection: the chunk id (`chunk-{index}`), its
/// embedding, and the chunk text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkRecord {
    pub id: String,
    pub embedding: Vec<f32>,
    pub text: String,
}

/// A chunk returned from a nearest-neighbor query, in backend rank order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredChunk {
    pub id: String,
    pub text: String,
    pub score: f64,
}

/// Outcome of an indexing pass for one document.
#[derive(Debug, Clone)]
pub struct IndexReport {
    pub collection: String,
    /// Records inserted by this call. Zero when the collection was already
    /// populated and the re-indexing guard skipped insertion.
    pub inserted: usize,
    pub existing: usize,
}

/// Tunables for the answer pipeline.
#[derive(Debug, Clone, Copy)]
pub struct PipelineOptions {
    /// Maximum chunk size in whitespace-delimited words.
    pub max_chunk_words: usize,
    /// Number of chunks retrieved per question.
    pub top_k: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            max_chunk_words: 500,
            top_k: 5,
        }
    }
}
