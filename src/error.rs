//! Failure taxonomy for the screening pipeline.

use thiserror::Error;

/// Terminal, per-document failures. A failure here marks the document
/// failed and excludes it from the batch summary; the batch itself keeps
/// going. Scoring never appears in this enum: a failed scoring call
/// degrades to the sentinel score instead of failing the document.
#[derive(Error, Debug)]
pub enum ScreenError {
    /// Declared type is neither PDF nor DOCX.
    #[error("unsupported document format: {0}")]
    UnsupportedFormat(String),

    /// The underlying reader could not produce text (corrupt or
    /// password-protected input included).
    #[error("text extraction failed: {0}")]
    ExtractionFailed(String),

    /// Extraction produced no usable text.
    #[error("no text extracted from resume")]
    EmptyInput,

    /// Oracle transport failure, unparseable reply, or missing fields.
    #[error("resume structuring failed: {0}")]
    StructuringFailed(String),
}

impl ScreenError {
    /// Pipeline stage the failure belongs to, for per-document reports.
    pub fn stage(&self) -> &'static str {
        match self {
            ScreenError::UnsupportedFormat(_) => "upload",
            ScreenError::ExtractionFailed(_) => "extraction",
            ScreenError::EmptyInput | ScreenError::StructuringFailed(_) => "structuring",
        }
    }
}
