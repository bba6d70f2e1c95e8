use crate::chunking::{chunk_text, normalize_whitespace};
use crate::embeddings::Embedder;
use crate::error::{AnswerError, IngestError};
use crate::indexer::Indexer;
use crate::llm::LanguageModel;
use crate::loader::load_document;
use crate::models::PipelineOptions;
use crate::prompt::{build_answer_prompt, build_context};
use crate::retriever::retrieve_relevant_chunks;
use crate::router::ToolRouter;
use crate::tools::ToolRegistry;
use crate::traits::VectorIndex;
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info};

pub const EMPTY_DOCUMENT_MESSAGE: &str =
    "Error: Could not extract text from the document or document is empty.";
pub const EMPTY_CHUNKS_MESSAGE: &str =
    "Error: Could not create chunks from the document text.";
pub const NO_RELEVANT_CONTENT_MESSAGE: &str =
    "Error: Could not find relevant information in the document for your question.";

/// Composition root for the full pipeline: load → normalize → chunk →
/// index-if-new → retrieve → prompt → complete → route. Capability
/// implementations are injected once and shared across requests.
pub struct AnswerPipeline {
    embedder: Arc<dyn Embedder>,
    index: Arc<dyn VectorIndex>,
    llm: Arc<dyn LanguageModel>,
    indexer: Indexer,
    router: ToolRouter,
    options: PipelineOptions,
}

impl AnswerPipeline {
    pub fn new(
        embedder: Arc<dyn Embedder>,
        index: Arc<dyn VectorIndex>,
        llm: Arc<dyn LanguageModel>,
    ) -> Self {
        let indexer = Indexer::new(embedder.clone(), index.clone());
        Self {
            embedder,
            index,
            llm,
            indexer,
            router: ToolRouter::new(ToolRegistry::builtin()),
            options: PipelineOptions::default(),
        }
    }

    pub fn with_options(mut self, options: PipelineOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> PipelineOptions {
        self.options
    }

    /// Single entry point for callers that must never see a failure: any
    /// error is logged with its structured kind, then flattened into a
    /// descriptive answer string.
    pub async fn answer(&self, document_path: &Path, question: &str) -> String {
        match self.answer_checked(document_path, question).await {
            Ok(answer) => answer,
            Err(failure) => {
                error!(kind = failure.kind(), error = %failure, "answer pipeline failed");
                flatten_error(&failure)
            }
        }
    }

    /// Typed variant of [`answer`](Self::answer) for callers that want the
    /// error kind instead of a flattened message.
    pub async fn answer_checked(
        &self,
        document_path: &Path,
        question: &str,
    ) -> Result<String, AnswerError> {
        let document = load_document(document_path)?;
        if document.text.is_empty() {
            return Err(IngestError::EmptyDocument(document.file_name).into());
        }

        self.answer_text(&document.file_name, &document.text, question).await
    }

    /// Run the pipeline over already-extracted text. The document id (its
    /// base filename) keys the collection, so repeated questions about the
    /// same document reuse the stored chunks.
    pub async fn answer_text(
        &self,
        document_id: &str,
        text: &str,
        question: &str,
    ) -> Result<String, AnswerError> {
        let normalized = normalize_whitespace(text);
        if normalized.is_empty() {
            return Err(IngestError::EmptyDocument(document_id.to_string()).into());
        }

        let chunks = chunk_text(&normalized, self.options.max_chunk_words);
        if chunks.is_empty() {
            return Err(IngestError::EmptyChunkSet(document_id.to_string()).into());
        }

        let report = self.indexer.index_document(document_id, &chunks).await?;
        info!(
            document_id = %document_id,
            collection = %report.collection,
            inserted = report.inserted,
            existing = report.existing,
            chunk_count = chunks.len(),
            "document ready for retrieval"
        );

        let retrieved = retrieve_relevant_chunks(
            question,
            &report.collection,
            self.embedder.as_ref(),
            self.index.as_ref(),
            self.options.top_k,
        )
        .await?;

        if retrieved.is_empty() {
            return Err(AnswerError::NoRelevantContent);
        }

        let context = build_context(&retrieved);
        let prompt = build_answer_prompt(&context, question);
        let raw_answer = self.llm.complete(&prompt).await?;

        Ok(self.router.route(&raw_answer, question).into_text())
    }
}

fn flatten_error(failure: &AnswerError) -> String {
    match failure {
        AnswerError::Ingest(IngestError::EmptyDocument(_)) => EMPTY_DOCUMENT_MESSAGE.to_string(),
        AnswerError::Ingest(IngestError::EmptyChunkSet(_)) => EMPTY_CHUNKS_MESSAGE.to_string(),
        AnswerError::NoRelevantContent => NO_RELEVANT_CONTENT_MESSAGE.to_string(),
        other => format!("Error processing document query: {other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeddings::HashedNgramEmbedder;
    use crate::models::{ChunkRecord, ScoredChunk};
    use crate::stores::InMemoryIndex;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct FakeLlm {
        response: String,
        prompts: Mutex<Vec<String>>,
    }

    impl FakeLlm {
        fn returning(response: &str) -> Self {
            Self {
                response: response.to_string(),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl LanguageModel for FakeLlm {
        async fn complete(&self, prompt: &str) -> Result<String, AnswerError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok(self.response.clone())
        }
    }

    struct FailingLlm;

    #[async_trait]
    impl LanguageModel for FailingLlm {
        async fn complete(&self, _prompt: &str) -> Result<String, AnswerError> {
            Err(AnswerError::LlmProvider("upstream unavailable".to_string()))
        }
    }

    /// Index that reports itself populated but retrieves nothing.
    struct BarrenIndex;

    #[async_trait]
    impl VectorIndex for BarrenIndex {
        async fn ensure_collection(&self, _name: &str, _dimensions: usize) -> Result<(), AnswerError> {
            Ok(())
        }

        async fn count(&self, _collection: &str) -> Result<usize, AnswerError> {
            Ok(1)
        }

        async fn insert(&self, _collection: &str, _records: &[ChunkRecord]) -> Result<(), AnswerError> {
            Ok(())
        }

        async fn query(
            &self,
            _collection: &str,
            _vector: &[f32],
            _top_k: usize,
        ) -> Result<Vec<ScoredChunk>, AnswerError> {
            Ok(Vec::new())
        }
    }

    fn six_hundred_words() -> String {
        (0..600).map(|i| format!("word{i}")).collect::<Vec<_>>().join(" ")
    }

    fn pipeline_with(llm: Arc<dyn LanguageModel>) -> (AnswerPipeline, Arc<InMemoryIndex>) {
        let index = Arc::new(InMemoryIndex::new());
        let embedder = Arc::new(HashedNgramEmbedder::default());
        (AnswerPipeline::new(embedder, index.clone(), llm), index)
    }

    #[tokio::test]
    async fn direct_answer_passes_through_and_indexing_is_idempotent() {
        let llm = Arc::new(FakeLlm::returning("The term is two years."));
        let (pipeline, index) = pipeline_with(llm.clone());
        let text = six_hundred_words();

        let answer = pipeline
            .answer_text("agreement.pdf", &text, "how long is the term?")
            .await
            .unwrap();
        assert_eq!(answer, "The term is two years.");

        let collection = crate::indexer::collection_name_for("agreement.pdf");
        assert_eq!(index.count(&collection).await.unwrap(), 2);

        pipeline
            .answer_text("agreement.pdf", &text, "who are the parties?")
            .await
            .unwrap();
        assert_eq!(index.count(&collection).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn prompt_carries_retrieved_context_and_question() {
        let llm = Arc::new(FakeLlm::returning("Direct answer."));
        let (pipeline, _index) = pipeline_with(llm.clone());

        pipeline
            .answer_text("ctx.pdf", "alpha beta gamma delta", "what is alpha?")
            .await
            .unwrap();

        let prompts = llm.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("alpha beta gamma delta"));
        assert!(prompts[0].contains("QUESTION:\nwhat is alpha?"));
        assert!(prompts[0].ends_with("ANSWER:"));
    }

    #[tokio::test]
    async fn tool_directive_in_llm_output_is_dispatched() {
        let llm = Arc::new(FakeLlm::returning("use tool: extract_dates Signed on 2024-01-15"));
        let (pipeline, _index) = pipeline_with(llm);

        let answer = pipeline
            .answer_text("dated.pdf", "Signed on 2024-01-15 by both parties.", "when was it signed?")
            .await
            .unwrap();

        assert!(answer.contains("Tool `extract_dates` executed."));
        assert!(answer.contains("2024-01-15"));
    }

    #[tokio::test]
    async fn empty_text_flattens_to_the_empty_document_message() {
        let llm = Arc::new(FakeLlm::returning("unused"));
        let (pipeline, _index) = pipeline_with(llm);

        let result = pipeline.answer_text("empty.pdf", "   \n ", "anything?").await;
        let failure = result.unwrap_err();
        assert_eq!(flatten_error(&failure), EMPTY_DOCUMENT_MESSAGE);
    }

    #[tokio::test]
    async fn empty_retrieval_flattens_to_the_no_content_message() {
        let embedder = Arc::new(HashedNgramEmbedder::default());
        let pipeline = AnswerPipeline::new(
            embedder,
            Arc::new(BarrenIndex),
            Arc::new(FakeLlm::returning("unused")),
        );

        let result = pipeline
            .answer_text("hollow.pdf", "some document text", "anything?")
            .await;
        let failure = result.unwrap_err();
        assert!(matches!(failure, AnswerError::NoRelevantContent));
        assert_eq!(flatten_error(&failure), NO_RELEVANT_CONTENT_MESSAGE);
    }

    #[tokio::test]
    async fn llm_failures_flatten_to_a_descriptive_message() {
        let (pipeline, _index) = pipeline_with(Arc::new(FailingLlm));

        let result = pipeline
            .answer_text("flaky.pdf", "document body text", "anything?")
            .await;
        let failure = result.unwrap_err();
        assert_eq!(failure.kind(), "llm_provider");
        assert!(flatten_error(&failure).starts_with("Error processing document query:"));
    }
}
