pub mod chunking;
pub mod embeddings;
pub mod error;
pub mod indexer;
pub mod llm;
pub mod loader;
pub mod models;
pub mod orchestrator;
pub mod prompt;
pub mod retriever;
pub mod router;
pub mod stores;
pub mod tools;
pub mod traits;

pub use chunking::{chunk_text, normalize_whitespace, DEFAULT_MAX_CHUNK_WORDS};
pub use embeddings::{
    Embedder, HashedNgramEmbedder, RemoteEmbedder, RemoteEmbedderConfig,
    DEFAULT_EMBEDDING_DIMENSIONS,
};
pub use error::{AnswerError, IngestError};
pub use indexer::{collection_name_for, Indexer};
pub use llm::{GeminiClient, GeminiConfig, LanguageModel, DEFAULT_GEMINI_MODEL};
pub use loader::{discover_documents, load_document};
pub use models::{
    ChunkRecord, DiscoveredDocument, DocumentKind, IndexReport, LoadedDocument, PipelineOptions,
    ScoredChunk,
};
pub use orchestrator::AnswerPipeline;
pub use prompt::{build_answer_prompt, build_context};
pub use retriever::{retrieve_relevant_chunks, DEFAULT_TOP_K};
pub use router::{parse_directive, Directive, Routed, ToolRouter};
pub use stores::{ChromaIndex, InMemoryIndex};
pub use tools::{extract_dates, extract_parties, summarize_document, ToolKind, ToolRegistry};
pub use traits::VectorIndex;
