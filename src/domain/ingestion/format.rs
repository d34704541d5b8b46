//! Supported source document formats

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentFormat {
    Pdf,
    Docx,
    Csv,
    /// UTF-8 text: `.txt` and `.md`
    PlainText,
}

impl DocumentFormat {
    /// Detect the format from the lower-cased file extension
    pub fn from_path(path: &Path) -> Result<Self, DomainError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "pdf" => Ok(Self::Pdf),
            "docx" => Ok(Self::Docx),
            "csv" => Ok(Self::Csv),
            "txt" | "md" => Ok(Self::PlainText),
            _ => Err(DomainError::unsupported_format(if extension.is_empty() {
                "<none>".to_string()
            } else {
                format!(".{}", extension)
            })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_format() {
        assert_eq!(
            DocumentFormat::from_path(Path::new("a/report.PDF")).unwrap(),
            DocumentFormat::Pdf
        );
        assert_eq!(
            DocumentFormat::from_path(Path::new("notes.docx")).unwrap(),
            DocumentFormat::Docx
        );
        assert_eq!(
            DocumentFormat::from_path(Path::new("table.csv")).unwrap(),
            DocumentFormat::Csv
        );
        assert_eq!(
            DocumentFormat::from_path(Path::new("README.md")).unwrap(),
            DocumentFormat::PlainText
        );
    }

    #[test]
    fn test_unsupported_format() {
        let err = DocumentFormat::from_path(Path::new("sheet.xlsx")).unwrap_err();
        assert_eq!(err.to_string(), "Unsupported format: .xlsx");

        let err = DocumentFormat::from_path(Path::new("Makefile")).unwrap_err();
        assert!(matches!(err, DomainError::UnsupportedFormat { .. }));
    }
}
