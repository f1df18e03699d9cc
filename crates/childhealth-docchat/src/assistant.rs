//! The document assistant: background start-up, status, question answering.

use std::path::PathBuf;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use childhealth_common::config::DocChatConfig;
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::backend::{AnswerBackend, GeminiBackend};
use crate::chunker::{split_text, ChunkerConfig};
use crate::index::{Chunk, LexicalIndex};
use crate::loader::{load_documents, SourcePage};
use crate::status::{AssistantStatus, LoadingStage};
use crate::DocChatError;

pub const SYSTEM_PROMPT: &str = "You are a Pediatric Healthcare assistant for the question answering task. \
Use the following pieces of retrieved context to answer \
the question about children's health, nutrition, and medical care. \
If you don't know the answer, say that you don't know. \
Use clear, informative language suitable for parents and caregivers.\n\n{context}";

pub const NO_DOCUMENTS: &str = "No PDF files could be loaded. Please check the file paths.";
pub const NO_BACKEND: &str =
    "No language model configured. Set CHILDHEALTH_GEMINI_API_KEY or GOOGLE_API_KEY.";

/// Fill the system prompt with retrieved chunk texts, blank-line separated.
pub fn build_system_prompt(context: &[&str]) -> String {
    SYSTEM_PROMPT.replace("{context}", &context.join("\n\n"))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum AssistantReply {
    /// Start-up still running; carries the status at the time of asking.
    Initializing(AssistantStatus),
    /// Start-up failed for good.
    Failed(String),
    Answer(String),
    /// Retrieval or generation failed for this question only.
    Error(String),
}

impl AssistantReply {
    pub fn kind(&self) -> &'static str {
        match self {
            AssistantReply::Initializing(_) => "initializing",
            AssistantReply::Failed(_) => "failed",
            AssistantReply::Answer(_) => "answer",
            AssistantReply::Error(_) => "error",
        }
    }

    /// The message shown in the chat transcript.
    pub fn text(&self) -> String {
        match self {
            AssistantReply::Initializing(status) => format!(
                "I'm still initializing. Current status: {status}. Please try again in a moment."
            ),
            AssistantReply::Failed(reason) => format!("Initialization failed: {reason}"),
            AssistantReply::Answer(text) => text.clone(),
            AssistantReply::Error(msg) => format!("Error processing your query: {msg}"),
        }
    }
}

struct Engine {
    index: LexicalIndex,
    backend: Arc<dyn AnswerBackend>,
}

pub struct DocAssistant {
    documents: Vec<PathBuf>,
    chunker: ChunkerConfig,
    top_k: usize,
    backend: Option<Arc<dyn AnswerBackend>>,
    status: watch::Sender<AssistantStatus>,
    engine: OnceLock<Engine>,
}

impl DocAssistant {
    pub fn new(cfg: &DocChatConfig, backend: Option<Arc<dyn AnswerBackend>>) -> Arc<Self> {
        let (status, _) = watch::channel(AssistantStatus::NotStarted);
        Arc::new(Self {
            documents: cfg.documents.clone(),
            chunker: ChunkerConfig { chunk_size: cfg.chunk_size, chunk_overlap: cfg.chunk_overlap },
            top_k: cfg.top_k,
            backend,
            status,
            engine: OnceLock::new(),
        })
    }

    /// Build with a Gemini backend when an API key is available.
    pub fn from_config(cfg: &DocChatConfig) -> Arc<Self> {
        let backend: Option<Arc<dyn AnswerBackend>> = match cfg.resolve_api_key() {
            Some(key) => match GeminiBackend::new(
                key,
                cfg.model.clone(),
                cfg.temperature,
                Duration::from_secs(cfg.timeout_secs),
            ) {
                Ok(b) => Some(Arc::new(b) as Arc<dyn AnswerBackend>),
                Err(e) => {
                    warn!(error = %e, "could not build Gemini client");
                    None
                }
            },
            None => {
                warn!("no Gemini API key configured, assistant will not answer questions");
                None
            }
        };
        Self::new(cfg, backend)
    }

    /// Current status.
    pub fn status(&self) -> AssistantStatus {
        self.status.borrow().clone()
    }

    /// Receiver that wakes on every status change.
    pub fn subscribe(&self) -> watch::Receiver<AssistantStatus> {
        self.status.subscribe()
    }

    fn set_status(&self, status: AssistantStatus) {
        debug!(status = %status, "assistant status");
        self.status.send_replace(status);
    }

    /// Run start-up on a background task.
    pub fn start(self: &Arc<Self>) -> JoinHandle<()> {
        let this = Arc::clone(self);
        tokio::spawn(async move { this.initialise().await })
    }

    /// Run start-up to completion. A second call after success is a no-op.
    pub async fn initialise(&self) {
        if self.engine.get().is_some() {
            return;
        }
        match self.build_engine().await {
            Ok(engine) => {
                info!(chunks = engine.index.len(), model = engine.backend.model_id(), "assistant ready");
                // First engine wins if initialise ran twice concurrently.
                let _ = self.engine.set(engine);
                self.set_status(AssistantStatus::Ready);
            }
            Err(reason) => {
                error!(reason = %reason, "assistant initialisation failed");
                self.set_status(AssistantStatus::Failed(reason));
            }
        }
    }

    async fn build_engine(&self) -> Result<Engine, String> {
        self.set_status(AssistantStatus::Loading(LoadingStage::LoadingDocuments));
        let paths = self.documents.clone();
        let pages = blocking(move || load_documents(&paths)).await?;
        if pages.is_empty() {
            return Err(NO_DOCUMENTS.to_string());
        }

        self.set_status(AssistantStatus::Loading(LoadingStage::SplittingDocuments));
        let cfg = self.chunker;
        let chunks = blocking(move || chunk_pages(&pages, &cfg)).await?;
        if chunks.is_empty() {
            return Err(NO_DOCUMENTS.to_string());
        }
        info!(chunks = chunks.len(), "documents split");

        self.set_status(AssistantStatus::Loading(LoadingStage::BuildingIndex));
        let index = blocking(move || LexicalIndex::build(chunks)).await?;

        self.set_status(AssistantStatus::Loading(LoadingStage::InitializingModel));
        let backend = self.backend.clone().ok_or_else(|| NO_BACKEND.to_string())?;

        Ok(Engine { index, backend })
    }

    /// Answer a question. Blank questions are ignored (`None`).
    pub async fn ask(&self, query: &str) -> Option<AssistantReply> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }

        let Some(engine) = self.engine.get() else {
            return Some(match self.status() {
                AssistantStatus::Failed(reason) => AssistantReply::Failed(reason),
                other => AssistantReply::Initializing(other),
            });
        };

        let hits = engine.index.search(query, self.top_k);
        debug!(n = hits.len(), "retrieved context chunks");
        let context: Vec<&str> = hits.iter().map(|h| h.chunk.text.as_str()).collect();
        let prompt = build_system_prompt(&context);

        Some(match engine.backend.answer(&prompt, query).await {
            Ok(text) => AssistantReply::Answer(text),
            Err(e) => {
                warn!(error = %e, "assistant query failed");
                AssistantReply::Error(DocChatError::from(e).to_string())
            }
        })
    }
}

fn chunk_pages(pages: &[SourcePage], cfg: &ChunkerConfig) -> Vec<Chunk> {
    pages
        .iter()
        .flat_map(|p| {
            split_text(&p.text, cfg).into_iter().map(move |text| Chunk {
                source: p.source.clone(),
                page: p.page,
                text,
            })
        })
        .collect()
}

async fn blocking<T, F>(f: F) -> Result<T, String>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| DocChatError::Task(e.to_string()).to_string())
}
