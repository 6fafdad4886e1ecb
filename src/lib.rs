//! Svar - YouTube Transcript Chatbot
//!
//! An HTTP service for chatting with a YouTube video's transcript using
//! retrieval-augmented generation.
//!
//! The name "Svar" comes from the Norwegian word for "answer."
//!
//! # Overview
//!
//! Svar lets a client:
//! - Load a YouTube video by URL: the transcript is fetched, split into
//!   overlapping chunks, and embedded into an in-memory vector index
//! - Ask questions about the loaded video and get markdown-formatted,
//!   AI-generated answers grounded in the transcript
//!
//! Exactly one video is loaded at a time; a new extraction replaces the
//! previous one.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration and prompt templates
//! - `youtube` - Video ID extraction and transcript retrieval
//! - `chunking` - Transcript splitting into overlapping chunks
//! - `embedding` - Embedding generation
//! - `vector_store` - In-memory vector index
//! - `rag` - Answer chain for question answering
//! - `session` - Single-slot session state and pipeline coordination
//! - `server` - HTTP API
//!
//! # Example
//!
//! ```rust,no_run
//! use svar::config::Settings;
//! use svar::session::Session;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let session = Session::new(settings)?;
//!
//!     let report = session
//!         .ingest("https://www.youtube.com/watch?v=dQw4w9WgXcQ")
//!         .await?;
//!     println!("Indexed {} chunks", report.chunks_count);
//!
//!     let chat = session.ask("What is this video about?").await?;
//!     println!("{}", chat.answer);
//!
//!     Ok(())
//! }
//! ```

pub mod chunking;
pub mod cli;
pub mod config;
pub mod embedding;
pub mod error;
pub mod openai;
pub mod rag;
pub mod server;
pub mod session;
pub mod vector_store;
pub mod youtube;

pub use error::{Result, SvarError};
