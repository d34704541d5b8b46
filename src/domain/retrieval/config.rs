use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Retrieval tuning knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Passages returned per search
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    /// Relevance/diversity trade-off; 1.0 is pure relevance
    #[serde(default = "default_mmr_lambda")]
    pub mmr_lambda: f32,
    /// Candidates fetched per requested passage before re-ranking
    #[serde(default = "default_fetch_multiplier")]
    pub fetch_multiplier: usize,
}

fn default_top_k() -> usize {
    5
}

fn default_mmr_lambda() -> f32 {
    0.45
}

fn default_fetch_multiplier() -> usize {
    3
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            mmr_lambda: default_mmr_lambda(),
            fetch_multiplier: default_fetch_multiplier(),
        }
    }
}

impl RetrievalConfig {
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_mmr_lambda(mut self, lambda: f32) -> Self {
        self.mmr_lambda = lambda;
        self
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if !(0.0..=1.0).contains(&self.mmr_lambda) {
            return Err(DomainError::validation(format!(
                "mmr_lambda must be within [0, 1], got {}",
                self.mmr_lambda
            )));
        }
        if self.fetch_multiplier == 0 {
            return Err(DomainError::validation("fetch_multiplier must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RetrievalConfig::default();

        assert_eq!(config.top_k, 5);
        assert_eq!(config.fetch_multiplier, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_lambda_range() {
        assert!(RetrievalConfig::default().with_mmr_lambda(1.2).validate().is_err());
        assert!(RetrievalConfig::default().with_mmr_lambda(0.0).validate().is_ok());
    }
}
