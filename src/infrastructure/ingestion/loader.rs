//! Plain-text extraction from PDF, DOCX, CSV and UTF-8 text files

use std::io::{Cursor, Read};
use std::path::Path;

use async_trait::async_trait;
use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::debug;

use crate::domain::ingestion::{DocumentFormat, DocumentLoader};
use crate::domain::DomainError;

/// Upper bound on the decompressed size of `word/document.xml`
const MAX_DOCX_XML_BYTES: u64 = 50 * 1024 * 1024;

/// Loads documents from the local filesystem, dispatching on extension
#[derive(Debug, Clone)]
pub struct FileDocumentLoader {
    csv_max_rows: usize,
}

impl Default for FileDocumentLoader {
    fn default() -> Self {
        Self {
            csv_max_rows: 50_000,
        }
    }
}

impl FileDocumentLoader {
    pub fn new(csv_max_rows: usize) -> Self {
        Self { csv_max_rows }
    }
}

#[async_trait]
impl DocumentLoader for FileDocumentLoader {
    async fn load(&self, path: &Path) -> Result<String, DomainError> {
        let format = DocumentFormat::from_path(path)?;
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to read {}: {}", path.display(), e)))?;

        debug!(path = %path.display(), ?format, bytes = bytes.len(), "Loading document");

        match format {
            DocumentFormat::Pdf => {
                tokio::task::spawn_blocking(move || extract_pdf(&bytes))
                    .await
                    .map_err(|e| DomainError::internal(format!("PDF extraction panicked: {}", e)))?
            }
            DocumentFormat::Docx => {
                tokio::task::spawn_blocking(move || extract_docx(&bytes))
                    .await
                    .map_err(|e| DomainError::internal(format!("DOCX extraction panicked: {}", e)))?
            }
            DocumentFormat::Csv => read_csv(&bytes, self.csv_max_rows),
            DocumentFormat::PlainText => utf8(bytes),
        }
    }
}

fn utf8(bytes: Vec<u8>) -> Result<String, DomainError> {
    String::from_utf8(bytes)
        .map_err(|e| DomainError::validation(format!("File is not UTF-8: {}", e)))
}

fn extract_pdf(bytes: &[u8]) -> Result<String, DomainError> {
    pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| DomainError::validation(format!("PDF extraction failed: {}", e)))
}

/// Header plus at most `max_rows` data rows
fn read_csv(bytes: &[u8], max_rows: usize) -> Result<String, DomainError> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| DomainError::validation(format!("CSV is not UTF-8: {}", e)))?;

    Ok(text
        .lines()
        .take(max_rows.saturating_add(1))
        .collect::<Vec<_>>()
        .join("\n"))
}

fn extract_docx(bytes: &[u8]) -> Result<String, DomainError> {
    let ooxml = |e: &dyn std::fmt::Display| {
        DomainError::validation(format!("DOCX extraction failed: {}", e))
    };

    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).map_err(|e| ooxml(&e))?;
    let entry = archive.by_name("word/document.xml").map_err(|e| ooxml(&e))?;

    let mut xml = Vec::new();
    entry
        .take(MAX_DOCX_XML_BYTES)
        .read_to_end(&mut xml)
        .map_err(|e| ooxml(&e))?;
    if xml.len() as u64 >= MAX_DOCX_XML_BYTES {
        return Err(ooxml(&"word/document.xml exceeds size limit"));
    }

    docx_paragraphs(&xml).map_err(|e| ooxml(&e))
}

/// Concatenate `w:t` runs per `w:p` paragraph; non-blank paragraphs are
/// joined with newlines
fn docx_paragraphs(xml: &[u8]) -> Result<String, quick_xml::Error> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();
    let mut paragraphs: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"t" => in_text = true,
                b"p" => current.clear(),
                _ => {}
            },
            Event::End(e) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"p" => {
                    if !current.trim().is_empty() {
                        paragraphs.push(std::mem::take(&mut current));
                    }
                }
                _ => {}
            },
            Event::Empty(e) if e.local_name().as_ref() == b"tab" => current.push('\t'),
            Event::Text(t) if in_text => current.push_str(&t.unescape()?),
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(paragraphs.join("\n"))
}
