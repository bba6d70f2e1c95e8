use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use legal_review_core::{
    chunk_text, discover_documents, load_document, normalize_whitespace, AnswerPipeline,
    ChromaIndex, Embedder, GeminiClient, GeminiConfig, HashedNgramEmbedder, InMemoryIndex,
    LanguageModel, PipelineOptions, RemoteEmbedder, RemoteEmbedderConfig, VectorIndex,
    DEFAULT_GEMINI_MODEL,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "legal-review", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Chroma base URL. The in-memory index is used when unset.
    #[arg(long)]
    chroma_url: Option<String>,

    /// Embedding server base URL. The in-process embedder is used when unset.
    #[arg(long)]
    embed_url: Option<String>,

    /// Embedding model name on the embedding server.
    #[arg(long, default_value = "nomic-embed-text")]
    embed_model: String,

    /// Embedding dimensions reported by the embedding server's model.
    #[arg(long, default_value = "768")]
    embed_dimensions: usize,

    /// Model used for answering.
    #[arg(long, default_value = DEFAULT_GEMINI_MODEL)]
    gemini_model: String,

    /// Google API key for the answering model.
    #[arg(long, env = "GOOGLE_API_KEY", hide_env_values = true)]
    google_api_key: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Ask a question about a document through the retrieval pipeline.
    Ask {
        /// Path to the .pdf or .docx document.
        #[arg(long)]
        file: PathBuf,
        /// Question to answer from the document.
        #[arg(long)]
        question: String,
        /// Number of chunks retrieved as context.
        #[arg(long, default_value = "5")]
        top_k: usize,
        /// Maximum chunk size in words.
        #[arg(long, default_value = "500")]
        max_chunk_words: usize,
    },
    /// List supported documents under a folder.
    Documents {
        /// Folder scanned recursively for .pdf and .docx files.
        #[arg(long)]
        dir: PathBuf,
    },
    /// Preview how a document splits into chunks.
    Inspect {
        /// Path to the .pdf or .docx document.
        #[arg(long)]
        file: PathBuf,
        /// Number of chunks to preview.
        #[arg(long, default_value = "5")]
        preview: usize,
        /// Maximum chunk size in words.
        #[arg(long, default_value = "500")]
        max_chunk_words: usize,
    },
}

fn build_embedder(cli: &Cli) -> anyhow::Result<Arc<dyn Embedder>> {
    match &cli.embed_url {
        Some(endpoint) => {
            let embedder = RemoteEmbedder::new(RemoteEmbedderConfig {
                endpoint: endpoint.clone(),
                model: cli.embed_model.clone(),
                dimensions: cli.embed_dimensions,
                timeout: Duration::from_secs(120),
            })
            .map_err(|error| anyhow::anyhow!(error.to_string()))?;
            Ok(Arc::new(embedder))
        }
        None => Ok(Arc::new(HashedNgramEmbedder::default())),
    }
}

fn build_index(cli: &Cli) -> Arc<dyn VectorIndex> {
    match &cli.chroma_url {
        Some(endpoint) => Arc::new(ChromaIndex::new(endpoint.clone())),
        None => Arc::new(InMemoryIndex::new()),
    }
}

fn build_llm(cli: &Cli) -> anyhow::Result<Arc<dyn LanguageModel>> {
    let api_key = cli
        .google_api_key
        .clone()
        .context("GOOGLE_API_KEY is required for the ask command")?;
    let client = GeminiClient::new(GeminiConfig::new(api_key).with_model(cli.gemini_model.clone()))
        .map_err(|error| anyhow::anyhow!(error.to_string()))?;
    Ok(Arc::new(client))
}

fn preview_line(chunk: &str, max_chars: usize) -> String {
    if chunk.chars().count() <= max_chars {
        return chunk.to_string();
    }
    let prefix: String = chunk.chars().take(max_chars).collect();
    format!("{prefix}...")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let app_version = env!("CARGO_PKG_VERSION");

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer())
        .init();

    let cli = Cli::parse();

    info!(
        version = app_version,
        started_at = %Utc::now().to_rfc3339(),
        "legal-review boot"
    );

    match &cli.command {
        Command::Ask {
            file,
            question,
            top_k,
            max_chunk_words,
        } => {
            let embedder = build_embedder(&cli)?;
            let index = build_index(&cli);
            let llm = build_llm(&cli)?;

            let pipeline = AnswerPipeline::new(embedder, index, llm).with_options(PipelineOptions {
                max_chunk_words: *max_chunk_words,
                top_k: *top_k,
            });

            info!(file = %file.display(), "processing question");
            let answer = pipeline.answer(file, question).await;
            println!("{answer}");
        }
        Command::Documents { dir } => {
            let documents = discover_documents(dir);
            if documents.is_empty() {
                println!("no supported documents found in {}", dir.display());
            }
            for document in &documents {
                println!(
                    "[{}] {} ({} bytes)",
                    document.kind.as_str(),
                    document.path.display(),
                    document.size_bytes
                );
            }
            println!("{} document(s)", documents.len());
        }
        Command::Inspect {
            file,
            preview,
            max_chunk_words,
        } => {
            let document = load_document(file).map_err(|error| anyhow::anyhow!(error.to_string()))?;
            let normalized = normalize_whitespace(&document.text);
            let chunks = chunk_text(&normalized, *max_chunk_words);

            println!(
                "{}: {} chars, {} chunk(s) at {} words per chunk",
                document.file_name,
                normalized.chars().count(),
                chunks.len(),
                max_chunk_words
            );
            for (position, chunk) in chunks.iter().take(*preview).enumerate() {
                println!("[chunk-{position}] {}", preview_line(chunk, 200));
            }
        }
    }

    Ok(())
}
