use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("pdf parse error: {0}")]
    PdfParse(String),

    #[error("docx parse error: {0}")]
    DocxParse(String),

    #[error("path has no file name: {0}")]
    MissingFileName(String),

    #[error("document has no extractable text: {0}")]
    EmptyDocument(String),

    #[error("chunking produced no chunks: {0}")]
    EmptyChunkSet(String),
}

#[derive(Debug, Error)]
pub enum AnswerError {
    #[error("embedding failed: {0}")]
    Embedding(String),

    #[error("invalid response from {backend}: {details}")]
    BackendResponse { backend: String, details: String },

    #[error("index request failed: {0}")]
    Index(String),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("serialize error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("no relevant content retrieved for the question")]
    NoRelevantContent,

    #[error("llm request timed out: {0}")]
    LlmTimeout(String),

    #[error("llm rate limited: {0}")]
    LlmRateLimited(String),

    #[error("llm provider error: {0}")]
    LlmProvider(String),

    #[error("tool not registered: {0}")]
    ToolNotFound(String),

    #[error(transparent)]
    Ingest(#[from] IngestError),
}

impl AnswerError {
    /// Stable kind label, logged before the orchestrator flattens the error
    /// into a user-facing string.
    pub fn kind(&self) -> &'static str {
        match self {
            AnswerError::Embedding(_) => "embedding",
            AnswerError::BackendResponse { .. } => "backend_response",
            AnswerError::Index(_) => "index",
            AnswerError::Http(_) => "http",
            AnswerError::Serialization(_) => "serialization",
            AnswerError::NoRelevantContent => "no_relevant_content",
            AnswerError::LlmTimeout(_) => "llm_timeout",
            AnswerError::LlmRateLimited(_) => "llm_rate_limited",
            AnswerError::LlmProvider(_) => "llm_provider",
            AnswerError::ToolNotFound(_) => "tool_not_found",
            AnswerError::Ingest(IngestError::UnsupportedFormat(_)) => "unsupported_format",
            AnswerError::Ingest(IngestError::EmptyDocument(_)) => "empty_document",
            AnswerError::Ingest(IngestError::EmptyChunkSet(_)) => "empty_chunk_set",
            AnswerError::Ingest(_) => "ingest",
        }
    }
}

pub type Result<T, E = IngestError> = std::result::Result<T, E>;
