//! Configuration module for Svar.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{Prompts, QaPrompts};
pub use settings::{
    ChunkingSettings, EmbeddingSettings, RagSettings, ServerSettings, Settings, TimeoutSettings,
};
