use serde::{Deserialize, Serialize};

use crate::domain::retrieval::RetrievalConfig;

/// Controller configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RagConfig {
    /// Rewrite cycles allowed before giving up
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Returned when the attempt budget is spent
    #[serde(default = "default_fallback_message")]
    pub fallback_message: String,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
}

fn default_max_attempts() -> u32 {
    3
}

fn default_fallback_message() -> String {
    "Oups, nous n'avons pas trouvé l'information souhaitée ! \
     Tentez de reformuler votre question pour de meilleurs résultats."
        .to_string()
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            fallback_message: default_fallback_message(),
            retrieval: RetrievalConfig::default(),
        }
    }
}

impl RagConfig {
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_fallback_message(mut self, message: impl Into<String>) -> Self {
        self.fallback_message = message.into();
        self
    }

    pub fn with_retrieval(mut self, retrieval: RetrievalConfig) -> Self {
        self.retrieval = retrieval;
        self
    }

    /// Attempt budget, never less than one
    pub fn effective_max_attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }
}
