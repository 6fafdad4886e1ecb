//! Answer chain: retrieval plus LLM answer synthesis.

use super::format_context;
use crate::config::{Prompts, RagSettings};
use crate::embedding::Embedder;
use crate::error::{Result, SvarError};
use crate::openai::create_client;
use crate::vector_store::VectorStore;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Question-answering chain over one transcript's vector index.
///
/// Built once per ingested video and reused for every question. Each call
/// is independent: no answers are cached and no conversation history is
/// carried between calls.
pub struct AnswerChain {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    temperature: f32,
    max_context_chunks: usize,
    store: Arc<dyn VectorStore>,
    embedder: Arc<dyn Embedder>,
    prompts: Prompts,
}

impl AnswerChain {
    /// Create a new answer chain over the given index.
    pub fn new(
        store: Arc<dyn VectorStore>,
        embedder: Arc<dyn Embedder>,
        settings: &RagSettings,
        request_timeout: Duration,
    ) -> Self {
        Self {
            client: create_client(request_timeout),
            model: settings.model.clone(),
            temperature: settings.temperature,
            max_context_chunks: settings.max_context_chunks,
            store,
            embedder,
            prompts: Prompts::default(),
        }
    }

    /// Set custom prompts.
    pub fn with_prompts(mut self, prompts: Prompts) -> Self {
        self.prompts = prompts;
        self
    }

    /// Answer a question from the indexed transcript.
    ///
    /// The question is augmented with markdown formatting instructions, the
    /// augmented form drives retrieval and fills the prompt template, and
    /// the model's raw text output is returned unmodified.
    #[instrument(skip(self), fields(question = %question))]
    pub async fn ask(&self, question: &str) -> Result<String> {
        info!("Processing question: {}", question);

        let augmented = self.prompts.qa.augment_question(question);

        let query_embedding = self.embedder.embed(&augmented).await?;
        let results = self
            .store
            .search(&query_embedding, self.max_context_chunks)
            .await?;

        debug!("Retrieved {} context chunks", results.len());

        let mut vars = HashMap::new();
        vars.insert("context".to_string(), format_context(&results));
        vars.insert("question".to_string(), augmented);

        let prompt = Prompts::render(&self.prompts.qa.template, &vars);

        let messages: Vec<ChatCompletionRequestMessage> =
            vec![ChatCompletionRequestUserMessageArgs::default()
                .content(prompt)
                .build()
                .map_err(|e| SvarError::AnswerChain(e.to_string()))?
                .into()];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(self.temperature)
            .build()
            .map_err(|e| SvarError::AnswerChain(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| SvarError::OpenAI(format!("Failed to generate response: {}", e)))?;

        let answer = response
            .choices
            .first()
            .and_then(|c| c.message.content.as_ref())
            .ok_or_else(|| SvarError::AnswerChain("Empty response from LLM".to_string()))?
            .clone();

        Ok(answer)
    }
}
