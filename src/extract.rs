//! Document text extraction for uploaded resumes.
//!
//! PDF text comes from lopdf page by page; DOCX text from walking the
//! docx-rs paragraph tree. No OCR and no layout reconstruction - a file
//! the readers cannot open surfaces as `ExtractionFailed`.

use crate::error::ScreenError;
use lopdf::Document;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
}

impl DocumentKind {
    /// Derive the kind from a file name, by extension.
    pub fn from_file_name(name: &str) -> Result<Self, ScreenError> {
        let lower = name.to_lowercase();
        if lower.ends_with(".pdf") {
            Ok(DocumentKind::Pdf)
        } else if lower.ends_with(".docx") {
            Ok(DocumentKind::Docx)
        } else {
            Err(ScreenError::UnsupportedFormat(name.to_string()))
        }
    }

    /// Derive the kind from a declared MIME type.
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        if content_type == "application/pdf" {
            Some(DocumentKind::Pdf)
        } else if content_type
            .contains("vnd.openxmlformats-officedocument.wordprocessingml.document")
        {
            Some(DocumentKind::Docx)
        } else {
            None
        }
    }
}

/// One uploaded resume, as received: display name, declared type, bytes.
#[derive(Debug, Clone)]
pub struct RawDocument {
    pub name: String,
    pub kind: DocumentKind,
    pub bytes: Vec<u8>,
}

impl RawDocument {
    pub fn new(name: String, kind: DocumentKind, bytes: Vec<u8>) -> Self {
        Self { name, kind, bytes }
    }
}

/// Extract plain text from a document. The result is trimmed and may be
/// empty (image-only PDFs for instance); emptiness is the caller's concern.
pub fn extract_text(document: &RawDocument) -> Result<String, ScreenError> {
    match document.kind {
        DocumentKind::Pdf => extract_text_from_pdf(&document.bytes),
        DocumentKind::Docx => extract_text_from_docx(&document.bytes),
    }
}

fn extract_text_from_pdf(data: &[u8]) -> Result<String, ScreenError> {
    let doc =
        Document::load_mem(data).map_err(|e| ScreenError::ExtractionFailed(e.to_string()))?;

    let mut text = String::new();
    for page_num in doc.get_pages().keys() {
        match doc.extract_text(&[*page_num]) {
            Ok(page_text) => {
                if !page_text.trim().is_empty() {
                    text.push_str(&page_text);
                    text.push('\n');
                }
            }
            Err(e) => {
                warn!("Failed to extract text from page {}: {}", page_num, e);
            }
        }
    }

    Ok(text.trim().to_string())
}

fn extract_text_from_docx(data: &[u8]) -> Result<String, ScreenError> {
    let docx =
        docx_rs::read_docx(data).map_err(|e| ScreenError::ExtractionFailed(e.to_string()))?;

    let mut text = String::new();
    for child in docx.document.children {
        if let docx_rs::DocumentChild::Paragraph(paragraph) = child {
            for paragraph_child in paragraph.children {
                if let docx_rs::ParagraphChild::Run(run) = paragraph_child {
                    for run_child in run.children {
                        if let docx_rs::RunChild::Text(t) = run_child {
                            text.push_str(&t.text);
                        }
                    }
                }
            }
            text.push('\n');
        }
    }

    Ok(text.trim().to_string())
}
