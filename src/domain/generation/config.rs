use serde::{Deserialize, Serialize};

/// Prompting parameters for the generator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
    /// Placeholders: `${question}`, `${context}`
    #[serde(default = "default_user_template")]
    pub user_template: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_system_prompt() -> String {
    "You are a retrieval-augmented assistant. Answer concisely and factually, using only \
     the provided context, and always cite your sources as [#id]. If the information is \
     not in the context, say that you do not know and suggest a different search."
        .to_string()
}

fn default_user_template() -> String {
    "Question: ${question}\n\n\
     Context (relevant excerpts, JSON):\n${context}\n\n\
     Instructions:\n\
     - Never invent information.\n\
     - Cite sources as [#id] where id is the excerpt id.\n\
     - If the context is insufficient, ask for clarification.\n"
        .to_string()
}

fn default_temperature() -> f32 {
    0.3
}

fn default_max_tokens() -> u32 {
    512
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            system_prompt: default_system_prompt(),
            user_template: default_user_template(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}
