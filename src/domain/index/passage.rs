use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Length of the hex content id derived from a passage's location
const SHORT_ID_LEN: usize = 10;

/// Stable content id for the `chunk_index`-th chunk of `source`.
///
/// Re-ingesting the same file yields the same ids.
pub fn short_id(source: &str, chunk_index: usize) -> String {
    let digest = Sha256::digest(format!("{}-{}", source, chunk_index).as_bytes());
    let mut id = hex::encode(digest);
    id.truncate(SHORT_ID_LEN);
    id
}

/// An ingested chunk of text with its embedding.
///
/// `id` equals the passage's row in the index snapshot that owns it. The
/// embedding lives in the vector file, not in the metadata record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Passage {
    pub id: u64,
    #[serde(alias = "cid")]
    pub short_id: String,
    /// Path relative to the ingestion root
    pub source: String,
    pub chunk_index: usize,
    pub text: String,
    #[serde(skip)]
    pub embedding: Vec<f32>,
}

impl Passage {
    pub fn new(
        id: u64,
        source: impl Into<String>,
        chunk_index: usize,
        text: impl Into<String>,
    ) -> Self {
        let source = source.into();
        Self {
            id,
            short_id: short_id(&source, chunk_index),
            source,
            chunk_index,
            text: text.into(),
            embedding: Vec::new(),
        }
    }

    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.embedding = embedding;
        self
    }
}

/// A passage returned by a search, with its similarity to the query
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredPassage {
    pub passage: Passage,
    /// Inner product with the normalised query vector
    pub score: f32,
    /// Marginal relevance at the moment the passage was picked
    pub mmr_score: Option<f32>,
}

impl ScoredPassage {
    pub fn new(passage: Passage, score: f32) -> Self {
        Self {
            passage,
            score,
            mmr_score: None,
        }
    }

    pub fn with_mmr_score(mut self, mmr_score: f32) -> Self {
        self.mmr_score = Some(mmr_score);
        self
    }

    pub fn id(&self) -> u64 {
        self.passage.id
    }

    pub fn text(&self) -> &str {
        &self.passage.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_id_is_deterministic() {
        let a = short_id("docs/guide.pdf", 3);
        let b = short_id("docs/guide.pdf", 3);
        let c = short_id("docs/guide.pdf", 4);

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 10);
        assert!(a.chars().all(|ch| ch.is_ascii_hexdigit()));
    }

    #[test]
    fn test_passage_new_derives_short_id() {
        let passage = Passage::new(7, "notes.txt", 0, "Paris is the capital of France.");

        assert_eq!(passage.id, 7);
        assert_eq!(passage.short_id, short_id("notes.txt", 0));
        assert!(passage.embedding.is_empty());
    }

    #[test]
    fn test_passage_record_accepts_cid_alias() {
        let json = r#"{"id":0,"cid":"abc123def0","source":"a.csv","chunk_index":2,"text":"t"}"#;
        let passage: Passage = serde_json::from_str(json).unwrap();

        assert_eq!(passage.short_id, "abc123def0");
        assert_eq!(passage.chunk_index, 2);
    }

    #[test]
    fn test_passage_serialization_omits_embedding() {
        let passage = Passage::new(0, "a.txt", 0, "text").with_embedding(vec![1.0, 0.0]);
        let json = serde_json::to_string(&passage).unwrap();

        assert!(!json.contains("embedding"));
        assert!(json.contains("\"short_id\""));
    }
}
