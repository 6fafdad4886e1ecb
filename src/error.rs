//! Error types for Svar.

use thiserror::Error;

/// Library-level error type for Svar operations.
#[derive(Error, Debug)]
pub enum SvarError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Transcript fetch failed: {0}")]
    TranscriptFetch(String),

    #[error("Timed out after {0} seconds")]
    Timeout(u64),

    #[error("Chunking failed: {0}")]
    Chunking(String),

    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    #[error("Vector store error: {0}")]
    VectorStore(String),

    #[error("Answer generation failed: {0}")]
    AnswerChain(String),

    #[error("OpenAI API error: {0}")]
    OpenAI(String),

    #[error("No transcript loaded. Please extract a transcript first.")]
    NoTranscript,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl SvarError {
    /// Whether this error is the caller's fault (maps to a 4xx response).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            SvarError::InvalidInput(_) | SvarError::TranscriptFetch(_) | SvarError::NoTranscript
        )
    }
}

/// Result type alias for Svar operations.
pub type Result<T> = std::result::Result<T, SvarError>;
