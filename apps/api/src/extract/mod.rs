//! Document Extractor: uploaded PDF, DOCX or TXT bytes → normalized plain text.

pub mod docx;

use std::path::Path;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Unsupported file type '{0}'")]
    Unsupported(String),

    #[error("File is {size} bytes; the limit is {limit} bytes")]
    TooLarge { size: usize, limit: usize },

    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    #[error("DOCX extraction failed: {0}")]
    Docx(String),

    #[error("No text could be extracted from the document")]
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Pdf,
    Docx,
    Txt,
}

impl DocumentKind {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "pdf" => Some(DocumentKind::Pdf),
            "docx" => Some(DocumentKind::Docx),
            "txt" | "text" => Some(DocumentKind::Txt),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            DocumentKind::Pdf => "pdf",
            DocumentKind::Docx => "docx",
            DocumentKind::Txt => "txt",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            DocumentKind::Pdf => "application/pdf",
            DocumentKind::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            DocumentKind::Txt => "text/plain; charset=utf-8",
        }
    }
}

/// Upload constraints, taken from `Config`.
#[derive(Debug, Clone)]
pub struct ExtractionLimits {
    pub max_bytes: usize,
    /// Lowercase extensions without the dot.
    pub allowed_extensions: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ExtractedDocument {
    pub kind: DocumentKind,
    pub text: String,
}

/// Checks the upload against `limits`, then extracts and normalizes its text.
pub fn extract_text(
    file_name: &str,
    data: &[u8],
    limits: &ExtractionLimits,
) -> Result<ExtractedDocument, ExtractionError> {
    let ext = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    if !limits.allowed_extensions.iter().any(|a| *a == ext) {
        return Err(ExtractionError::Unsupported(ext));
    }
    let kind = DocumentKind::from_extension(&ext).ok_or(ExtractionError::Unsupported(ext))?;

    if data.len() > limits.max_bytes {
        return Err(ExtractionError::TooLarge {
            size: data.len(),
            limit: limits.max_bytes,
        });
    }

    let raw = match kind {
        DocumentKind::Pdf => pdf_extract::extract_text_from_mem(data)
            .map_err(|e| ExtractionError::Pdf(e.to_string()))?,
        DocumentKind::Docx => docx::docx_to_text(data).map_err(ExtractionError::Docx)?,
        DocumentKind::Txt => String::from_utf8_lossy(data).into_owned(),
    };

    let text = normalize_text(&raw);
    if text.trim().is_empty() {
        return Err(ExtractionError::Empty);
    }

    debug!(file_name, kind = kind.extension(), chars = text.len(), "Extracted document text");
    Ok(ExtractedDocument { kind, text })
}

/// Unifies line endings, trims trailing spaces and collapses runs of blank lines to one.
pub fn normalize_text(raw: &str) -> String {
    let unified = raw.replace("\r\n", "\n").replace('\r', "\n").replace('\u{0c}', "\n");

    let mut out = String::with_capacity(unified.len());
    let mut blank_run = 0;
    for line in unified.lines() {
        let line = line.trim_end();
        if line.trim().is_empty() {
            blank_run += 1;
            if blank_run > 1 || out.is_empty() {
                continue;
            }
        } else {
            blank_run = 0;
        }
        out.push_str(line);
        out.push('\n');
    }
    out.trim_end().to_string()
}
