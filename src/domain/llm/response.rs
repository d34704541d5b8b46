use serde::{Deserialize, Serialize};

/// A chat completion reduced to what the answer loop reads from it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmResponse {
    pub model: String,
    pub content: String,
    /// The provider stopped because the token limit was reached
    pub truncated: bool,
    pub completion_tokens: Option<u32>,
}

impl LlmResponse {
    pub fn new(model: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            content: content.into(),
            truncated: false,
            completion_tokens: None,
        }
    }

    /// Reply with no model attribution, used by test doubles
    pub fn from_text(content: impl Into<String>) -> Self {
        Self::new(String::new(), content)
    }

    pub fn with_truncated(mut self, truncated: bool) -> Self {
        self.truncated = truncated;
        self
    }

    pub fn with_completion_tokens(mut self, tokens: u32) -> Self {
        self.completion_tokens = Some(tokens);
        self
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}
