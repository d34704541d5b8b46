use unicode_segmentation::UnicodeSegmentation;

use crate::domain::ingestion::ChunkingConfig;
use crate::domain::DomainError;

/// Split text into overlapping windows of `chunk_size` characters.
///
/// Windows start every `chunk_size - chunk_overlap` characters and are
/// trimmed; whitespace-only windows are dropped. The last window may be
/// shorter. Characters are extended grapheme clusters.
pub fn recursive_split(text: &str, config: &ChunkingConfig) -> Result<Vec<String>, DomainError> {
    config.validate()?;

    let graphemes: Vec<&str> = text.graphemes(true).collect();
    let step = config.step();
    let mut chunks = Vec::new();
    let mut start = 0;

    while start < graphemes.len() {
        let end = (start + config.chunk_size).min(graphemes.len());
        let window = graphemes[start..end].concat();
        let trimmed = window.trim();

        if !trimmed.is_empty() {
            chunks.push(trimmed.to_string());
        }

        if end == graphemes.len() {
            break;
        }
        start += step;
    }

    Ok(chunks)
}
