// src/web/handlers/screen.rs
//! Batch screening handler: collect uploads, run the pipeline, export.

use crate::environment::EnvironmentConfig;
use crate::export;
use crate::extract::{DocumentKind, RawDocument};
use crate::oracle::OpenAiOracle;
use crate::pipeline;
use crate::store::ResultStore;
use crate::web::types::{DataResponse, ScreenForm, ScreeningSummary, StandardErrorResponse};
use rocket::form::Form;
use rocket::fs::TempFile;
use rocket::serde::json::Json;
use rocket::State;
use tracing::{info, warn};

const MAX_UPLOAD_SIZE: u64 = 10 * 1024 * 1024;

pub async fn screen_handler(
    mut form: Form<ScreenForm<'_>>,
    environment: &State<EnvironmentConfig>,
    oracle: &State<OpenAiOracle>,
    store: &State<ResultStore>,
) -> Result<Json<DataResponse<ScreeningSummary>>, Json<StandardErrorResponse>> {
    if form.job_description.trim().is_empty() {
        return Err(Json(StandardErrorResponse::new(
            "Job description must not be empty".to_string(),
            "EMPTY_JOB_DESCRIPTION".to_string(),
            vec!["Provide the job description text alongside the resumes".to_string()],
        )));
    }

    if form.resumes.is_empty() {
        return Err(Json(StandardErrorResponse::new(
            "No resumes uploaded".to_string(),
            "NO_RESUMES".to_string(),
            vec![
                "Upload at least one PDF file (.pdf)".to_string(),
                "Upload at least one Word document (.docx)".to_string(),
            ],
        )));
    }

    let job_description = form.job_description.clone();
    let mut documents = Vec::new();
    let mut warnings = Vec::new();

    for file in form.resumes.iter_mut() {
        let file_name = file
            .raw_name()
            .and_then(|n| n.as_str())
            .unwrap_or("resume")
            .to_string();

        let Some(kind) = declared_kind(file, &file_name) else {
            warn!("Skipping {}: unsupported file type", file_name);
            warnings.push(format!("Unsupported file type for {}", file_name));
            continue;
        };

        if file.len() > MAX_UPLOAD_SIZE {
            warn!("Skipping {}: exceeds the upload size limit", file_name);
            warnings.push(format!("{} exceeds the 10MB upload limit", file_name));
            continue;
        }

        match read_upload(file).await {
            Ok(bytes) => documents.push(RawDocument::new(file_name, kind, bytes)),
            Err(e) => {
                warn!("Failed to read upload {}: {}", file_name, e);
                warnings.push(format!("Failed to read uploaded file {}: {}", file_name, e));
            }
        }
    }

    info!(
        "Screening batch of {} document(s) against the job description",
        documents.len()
    );

    let summary = pipeline::run_batch(
        oracle.inner(),
        store.inner(),
        &documents,
        &job_description,
    )
    .await;

    let export_file = if summary.rows.is_empty() {
        None
    } else {
        match export::write_batch_csv(&environment.export_path, &summary.rows) {
            Ok(path) => path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned()),
            Err(e) => {
                warn!("Failed to write batch export: {}", e);
                warnings.push(format!("Failed to write batch export: {}", e));
                None
            }
        }
    };

    let view = ScreeningSummary::from_batch(&summary, warnings, export_file);
    Ok(Json(DataResponse::success(
        "Screening completed".to_string(),
        view,
    )))
}

/// Declared type of the upload: content type first, extension fallback.
fn declared_kind(file: &TempFile<'_>, file_name: &str) -> Option<DocumentKind> {
    if let Some(content_type) = file.content_type() {
        if let Some(kind) = DocumentKind::from_content_type(&content_type.to_string()) {
            return Some(kind);
        }
    }
    DocumentKind::from_file_name(file_name).ok()
}

/// Spool the upload to a temp path and read it back; Rocket may hold small
/// uploads in memory with no stable path to read directly.
async fn read_upload(file: &mut TempFile<'_>) -> anyhow::Result<Vec<u8>> {
    let temp_path = std::env::temp_dir().join(format!("screenr_upload_{}", uuid::Uuid::new_v4()));

    file.persist_to(&temp_path).await?;
    let bytes = tokio::fs::read(&temp_path).await?;
    let _ = tokio::fs::remove_file(&temp_path).await;

    Ok(bytes)
}
