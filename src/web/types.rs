// src/web/types.rs
use crate::pipeline::{BatchSummary, FailureReport};
use crate::store::ResultRow;
use rocket::form::FromForm;
use rocket::fs::TempFile;
use rocket::http::ContentType;
use rocket::response::{self, Responder};
use rocket::serde::Serialize;
use rocket::{Request, Response};

/// The upload form: one job description plus any number of resumes.
#[derive(FromForm)]
pub struct ScreenForm<'f> {
    pub job_description: String,
    pub resumes: Vec<TempFile<'f>>,
}

/// CSV file download with an attachment disposition.
pub struct CsvResponse {
    pub data: Vec<u8>,
    pub filename: String,
}

impl<'r> Responder<'r, 'static> for CsvResponse {
    fn respond_to(self, _: &'r Request<'_>) -> response::Result<'static> {
        Response::build()
            .header(ContentType::CSV)
            .raw_header(
                "Content-Disposition",
                format!("attachment; filename=\"{}\"", self.filename),
            )
            .sized_body(self.data.len(), std::io::Cursor::new(self.data))
            .ok()
    }
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct TextResponse {
    pub success: bool,
    pub message: String,
}

impl TextResponse {
    pub fn success(message: String) -> Self {
        Self {
            success: true,
            message,
        }
    }
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct DataResponse<T> {
    pub success: bool,
    pub message: String,
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn success(message: String, data: T) -> Self {
        Self {
            success: true,
            message,
            data,
        }
    }
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct StandardErrorResponse {
    pub success: bool,
    pub error: String,
    pub error_code: String,
    pub suggestions: Vec<String>,
}

impl StandardErrorResponse {
    pub fn new(error: String, error_code: String, suggestions: Vec<String>) -> Self {
        Self {
            success: false,
            error,
            error_code,
            suggestions,
        }
    }
}

/// One completed result row, as returned to the client.
#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct RowView {
    pub resume_name: String,
    pub job_match_score: u32,
    pub category: String,
    pub decision: String,
    pub timestamp: String,
}

impl From<&ResultRow> for RowView {
    fn from(row: &ResultRow) -> Self {
        Self {
            resume_name: row.resume_name.clone(),
            job_match_score: row.job_match_score,
            category: row.category.clone(),
            decision: row.decision.clone(),
            timestamp: row.timestamp.to_rfc3339(),
        }
    }
}

/// Inline diagnostic for a document that failed mid-pipeline.
#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct FailureView {
    pub resume_name: String,
    pub stage: String,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_text_preview: Option<String>,
}

impl From<&FailureReport> for FailureView {
    fn from(report: &FailureReport) -> Self {
        Self {
            resume_name: report.resume_name.clone(),
            stage: report.stage.to_string(),
            reason: report.reason.clone(),
            raw_text_preview: report.raw_text_preview.clone(),
        }
    }
}

/// Batch response: completed rows only in `results`, per-document
/// failures and warnings reported alongside.
#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct ScreeningSummary {
    pub processed: usize,
    pub results: Vec<RowView>,
    pub failures: Vec<FailureView>,
    pub warnings: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_file: Option<String>,
}

impl ScreeningSummary {
    pub fn from_batch(
        summary: &BatchSummary,
        mut warnings: Vec<String>,
        export_file: Option<String>,
    ) -> Self {
        warnings.extend(summary.persistence_warnings.iter().cloned());
        Self {
            processed: summary.rows.len() + summary.failures.len(),
            results: summary.rows.iter().map(RowView::from).collect(),
            failures: summary.failures.iter().map(FailureView::from).collect(),
            warnings,
            export_file,
        }
    }
}
