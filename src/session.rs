//! Session controller for Svar.
//!
//! Owns the single-slot state for the currently loaded video and sequences
//! the ingestion pipeline: fetch transcript, chunk, embed, index, build the
//! answer chain. Questions are answered against the stored chain.

use crate::chunking::RecursiveSplitter;
use crate::config::{Prompts, Settings};
use crate::embedding::{Embedder, OpenAIEmbedder};
use crate::error::{Result, SvarError};
use crate::rag::AnswerChain;
use crate::vector_store::{Document, MemoryVectorStore, VectorStore};
use crate::youtube::{TranscriptSource, YoutubeTranscriptSource};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tracing::{info, instrument};

/// Maximum preview length returned from an ingestion, in characters.
const PREVIEW_CHARS: usize = 500;

/// State held for a successfully ingested video.
///
/// The index and the answer chain exist together or not at all: the session
/// state is one `Option` of this struct, replaced atomically on ingestion.
struct LoadedVideo {
    video_url: String,
    store: Arc<dyn VectorStore>,
    chain: Arc<AnswerChain>,
}

/// Report returned from a successful ingestion.
#[derive(Debug, Clone)]
pub struct IngestReport {
    pub video_url: String,
    pub transcript_length: usize,
    pub chunks_count: usize,
    pub preview: String,
}

/// Snapshot of the current session state.
#[derive(Debug, Clone)]
pub struct SessionStatus {
    pub loaded: bool,
    pub video_url: Option<String>,
    pub vectorstore_available: bool,
}

/// An answer together with the video it was answered from.
#[derive(Debug, Clone)]
pub struct ChatAnswer {
    pub answer: String,
    pub video_url: String,
}

/// The session controller.
///
/// Holds at most one loaded video. Ingestions are serialized on an internal
/// mutex so two concurrent requests cannot interleave pipeline stages; reads
/// take the state lock only long enough to clone out what they need.
pub struct Session {
    settings: Settings,
    prompts: Prompts,
    source: Arc<dyn TranscriptSource>,
    embedder: Arc<dyn Embedder>,
    state: RwLock<Option<LoadedVideo>>,
    ingest_guard: Mutex<()>,
}

impl Session {
    /// Create a session with the default YouTube source and OpenAI embedder.
    pub fn new(settings: Settings) -> Result<Self> {
        let source = Arc::new(YoutubeTranscriptSource::new()?);
        let embedder = Arc::new(OpenAIEmbedder::new(
            &settings.embedding.model,
            settings.embedding.dimensions as usize,
            Duration::from_secs(settings.timeouts.openai_request_seconds),
        ));

        Ok(Self::with_components(
            settings,
            Prompts::default(),
            source,
            embedder,
        ))
    }

    /// Create a session with custom components.
    pub fn with_components(
        settings: Settings,
        prompts: Prompts,
        source: Arc<dyn TranscriptSource>,
        embedder: Arc<dyn Embedder>,
    ) -> Self {
        Self {
            settings,
            prompts,
            source,
            embedder,
            state: RwLock::new(None),
            ingest_guard: Mutex::new(()),
        }
    }

    /// Extract a video ID from a URL, if the URL is recognized.
    pub fn extract_video_id(&self, video_url: &str) -> Option<String> {
        self.source.extract_id(video_url)
    }

    /// Run the full ingestion pipeline for a video URL.
    ///
    /// On success the previous state is replaced unconditionally, including
    /// re-ingestions of the same URL. On failure at any stage the previous
    /// state is left untouched.
    #[instrument(skip(self), fields(video_url = %video_url))]
    pub async fn ingest(&self, video_url: &str) -> Result<IngestReport> {
        // Serialize ingestions: concurrent requests queue here instead of
        // racing their pipeline stages against each other.
        let _guard = self.ingest_guard.lock().await;

        let video_id = self.source.extract_id(video_url).ok_or_else(|| {
            SvarError::InvalidInput(
                "Invalid YouTube URL or could not extract video ID".to_string(),
            )
        })?;

        info!("Fetching transcript for video {}", video_id);
        let fetch_timeout = self.settings.timeouts.transcript_fetch_seconds;
        let transcript =
            tokio::time::timeout(
                Duration::from_secs(fetch_timeout),
                self.source.fetch_transcript(&video_id),
            )
            .await
            .map_err(|_| SvarError::Timeout(fetch_timeout))??;

        let splitter = RecursiveSplitter::new(&self.settings.chunking);
        let chunks = splitter.split(&transcript);
        if chunks.is_empty() {
            return Err(SvarError::Chunking(
                "Transcript produced no chunks".to_string(),
            ));
        }
        info!("Split transcript into {} chunks", chunks.len());

        let embeddings = self.embedder.embed_batch(&chunks).await?;
        if embeddings.len() != chunks.len() {
            return Err(SvarError::Embedding(format!(
                "Expected {} embeddings, got {}",
                chunks.len(),
                embeddings.len()
            )));
        }

        // Build a fresh index; the live one is only swapped out after the
        // whole pipeline has succeeded.
        let store = Arc::new(MemoryVectorStore::new());
        let documents: Vec<Document> = chunks
            .iter()
            .zip(embeddings)
            .enumerate()
            .map(|(order, (content, embedding))| {
                Document::new(content.clone(), order as i32, embedding)
            })
            .collect();
        store.upsert_batch(&documents).await?;

        let chain = AnswerChain::new(
            store.clone() as Arc<dyn VectorStore>,
            self.embedder.clone(),
            &self.settings.rag,
            Duration::from_secs(self.settings.timeouts.openai_request_seconds),
        )
        .with_prompts(self.prompts.clone());

        let transcript_length = transcript.chars().count();
        let preview = if transcript_length > PREVIEW_CHARS {
            let head: String = transcript.chars().take(PREVIEW_CHARS).collect();
            format!("{}...", head)
        } else {
            transcript.clone()
        };

        let report = IngestReport {
            video_url: video_url.to_string(),
            transcript_length,
            chunks_count: documents.len(),
            preview,
        };

        let mut state = self.state.write().await;
        *state = Some(LoadedVideo {
            video_url: video_url.to_string(),
            store,
            chain: Arc::new(chain),
        });

        info!("Ingested {} ({} chunks)", video_url, report.chunks_count);
        Ok(report)
    }

    /// Answer a question against the currently loaded video.
    ///
    /// Fails with [`SvarError::NoTranscript`] when nothing is loaded. The
    /// LLM call runs outside the state lock.
    pub async fn ask(&self, question: &str) -> Result<ChatAnswer> {
        let (chain, video_url) = {
            let state = self.state.read().await;
            let loaded = state.as_ref().ok_or(SvarError::NoTranscript)?;
            (loaded.chain.clone(), loaded.video_url.clone())
        };

        let answer = chain.ask(question).await?;
        Ok(ChatAnswer { answer, video_url })
    }

    /// Report whether a video is loaded and which one.
    pub async fn status(&self) -> SessionStatus {
        let state = self.state.read().await;
        match state.as_ref() {
            Some(loaded) => SessionStatus {
                loaded: true,
                video_url: Some(loaded.video_url.clone()),
                vectorstore_available: loaded.store.document_count().await.is_ok(),
            },
            None => SessionStatus {
                loaded: false,
                video_url: None,
                vectorstore_available: false,
            },
        }
    }

    /// Unconditionally clear the loaded video.
    pub async fn clear(&self) {
        let mut state = self.state.write().await;
        *state = None;
    }
}
