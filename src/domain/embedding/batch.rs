//! One round trip to an embedding provider

use serde::{Deserialize, Serialize};

/// Texts to embed together, already prefixed for their encoding mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingRequest {
    pub model: String,
    pub texts: Vec<String>,
}

impl EmbeddingRequest {
    pub fn new(model: impl Into<String>, texts: Vec<String>) -> Self {
        Self {
            model: model.into(),
            texts,
        }
    }

    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }
}

/// Vectors returned for a request. Providers may answer out of order, so each
/// vector keeps the position of its input text.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EmbeddingResponse {
    pub model: String,
    vectors: Vec<(usize, Vec<f32>)>,
    pub prompt_tokens: Option<u32>,
}

impl EmbeddingResponse {
    pub fn new(model: impl Into<String>, vectors: Vec<(usize, Vec<f32>)>) -> Self {
        Self {
            model: model.into(),
            vectors,
            prompt_tokens: None,
        }
    }

    pub fn with_prompt_tokens(mut self, tokens: u32) -> Self {
        self.prompt_tokens = Some(tokens);
        self
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Vectors in input order
    pub fn into_vectors(mut self) -> Vec<Vec<f32>> {
        self.vectors.sort_by_key(|(position, _)| *position);
        self.vectors.into_iter().map(|(_, vector)| vector).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_vectors_restores_input_order() {
        let response = EmbeddingResponse::new(
            "multilingual-e5-base",
            vec![(1, vec![0.3, 0.4]), (0, vec![0.1, 0.2])],
        )
        .with_prompt_tokens(4);

        assert_eq!(response.prompt_tokens, Some(4));
        assert_eq!(
            response.into_vectors(),
            vec![vec![0.1, 0.2], vec![0.3, 0.4]]
        );
    }
}
