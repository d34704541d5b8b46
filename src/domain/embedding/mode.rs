//! Asymmetric encoding modes for retrieval embedding models

use serde::{Deserialize, Serialize};

/// Which side of the retrieval pair a text is embedded as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncodingMode {
    Query,
    Passage,
}

/// Text prefixes prepended per encoding mode (E5-style models)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodingPrefixes {
    #[serde(default = "default_query_prefix")]
    pub query: String,
    #[serde(default = "default_passage_prefix")]
    pub passage: String,
}

fn default_query_prefix() -> String {
    "query: ".to_string()
}

fn default_passage_prefix() -> String {
    "passage: ".to_string()
}

impl Default for EncodingPrefixes {
    fn default() -> Self {
        Self {
            query: default_query_prefix(),
            passage: default_passage_prefix(),
        }
    }
}

impl EncodingPrefixes {
    /// Prefixes that leave the text untouched, for symmetric models
    pub fn none() -> Self {
        Self {
            query: String::new(),
            passage: String::new(),
        }
    }

    pub fn prefix(&self, mode: EncodingMode) -> &str {
        match mode {
            EncodingMode::Query => &self.query,
            EncodingMode::Passage => &self.passage,
        }
    }

    pub fn apply(&self, mode: EncodingMode, text: &str) -> String {
        format!("{}{}", self.prefix(mode), text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prefixes() {
        let prefixes = EncodingPrefixes::default();

        assert_eq!(
            prefixes.apply(EncodingMode::Query, "capital of France"),
            "query: capital of France"
        );
        assert_eq!(
            prefixes.apply(EncodingMode::Passage, "Paris is the capital"),
            "passage: Paris is the capital"
        );
    }

    #[test]
    fn test_no_prefixes() {
        let prefixes = EncodingPrefixes::none();
        assert_eq!(prefixes.apply(EncodingMode::Query, "abc"), "abc");
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let prefixes: EncodingPrefixes = serde_json::from_str(r#"{"query": "q: "}"#).unwrap();
        assert_eq!(prefixes.query, "q: ");
        assert_eq!(prefixes.passage, "passage: ");
    }
}
