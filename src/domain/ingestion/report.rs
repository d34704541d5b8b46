use serde::{Deserialize, Serialize};

/// A file the pipeline could not index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedFile {
    pub path: String,
    pub reason: String,
}

/// Summary of one ingestion run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IngestionReport {
    pub files_indexed: usize,
    pub files_skipped: Vec<SkippedFile>,
    pub passages: usize,
}

impl IngestionReport {
    pub fn record_skip(&mut self, path: impl Into<String>, reason: impl Into<String>) {
        self.files_skipped.push(SkippedFile {
            path: path.into(),
            reason: reason.into(),
        });
    }
}
