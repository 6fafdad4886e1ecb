//! Prompt templates for Svar.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Prompts {
    pub qa: QaPrompts,
}

/// Prompts for transcript question answering.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QaPrompts {
    /// The QA prompt, rendered with `{{context}}` and `{{question}}`.
    pub template: String,
    /// Formatting instructions prepended to every user question.
    pub formatting: String,
}

impl Default for QaPrompts {
    fn default() -> Self {
        Self {
            template: r#"You are a helpful assistant that answers questions based on the provided YouTube video transcript context.

Context from the video:
{{context}}

Question: {{question}}

Please provide a detailed and accurate answer based on the video content. If the question cannot be answered from the transcript, please say so.

Answer:"#
                .to_string(),

            formatting: r#"Format your response using valid Markdown. Follow these guidelines:
- Use clear headings (##) for each section or main point
- Use bullet points for lists
- Bold important terms using **bold text**
- Keep sentences short and structured
- Do not include unnecessary introductions or disclaimers"#
                .to_string(),
        }
    }
}

impl QaPrompts {
    /// Prepend the markdown formatting instructions to a user question.
    ///
    /// The question itself is carried verbatim after the instructions.
    pub fn augment_question(&self, question: &str) -> String {
        format!("{}\n\nUser question: {}", self.formatting, question)
    }
}

impl Prompts {
    /// Render a prompt template with the given variables.
    pub fn render(template: &str, vars: &HashMap<String, String>) -> String {
        let mut result = template.to_string();
        for (key, value) in vars {
            result = result.replace(&format!("{{{{{}}}}}", key), value);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prompts() {
        let prompts = Prompts::default();
        assert!(prompts.qa.template.contains("{{context}}"));
        assert!(prompts.qa.template.contains("{{question}}"));
        assert!(!prompts.qa.formatting.is_empty());
    }

    #[test]
    fn test_render_template() {
        let template = "Context: {{context}}\nQuestion: {{question}}";
        let mut vars = HashMap::new();
        vars.insert("context".to_string(), "some chunks".to_string());
        vars.insert("question".to_string(), "why?".to_string());

        let result = Prompts::render(template, &vars);
        assert_eq!(result, "Context: some chunks\nQuestion: why?");
    }

    #[test]
    fn test_augment_question_keeps_question_verbatim() {
        let prompts = QaPrompts::default();
        let augmented = prompts.augment_question("What is the video about?");

        assert!(augmented.ends_with("User question: What is the video about?"));
        assert!(augmented.contains("Markdown"));
    }
}
