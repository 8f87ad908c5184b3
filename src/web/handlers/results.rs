// src/web/handlers/results.rs
//! Stored-results listing and CSV downloads.

use crate::environment::EnvironmentConfig;
use crate::export;
use crate::store::{ResultStore, StoredRow};
use crate::web::types::{CsvResponse, DataResponse, StandardErrorResponse};
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;
use tracing::error;

pub async fn list_results_handler(
    store: &State<ResultStore>,
) -> Result<Json<DataResponse<Vec<StoredRow>>>, Json<StandardErrorResponse>> {
    match store.list_rows().await {
        Ok(rows) => Ok(Json(DataResponse::success(
            format!("{} result(s) stored", rows.len()),
            rows,
        ))),
        Err(e) => {
            error!("Failed to list results: {}", e);
            Err(Json(StandardErrorResponse::new(
                "Failed to read stored results".to_string(),
                "STORE_READ_ERROR".to_string(),
                vec!["Try again in a few moments".to_string()],
            )))
        }
    }
}

/// Export the whole stored table as a freshly-stamped CSV.
pub async fn export_results_handler(
    store: &State<ResultStore>,
) -> Result<CsvResponse, Json<StandardErrorResponse>> {
    let rows = match store.list_rows().await {
        Ok(rows) => rows,
        Err(e) => {
            error!("Failed to read results for export: {}", e);
            return Err(Json(StandardErrorResponse::new(
                "Failed to read stored results".to_string(),
                "STORE_READ_ERROR".to_string(),
                vec!["Try again in a few moments".to_string()],
            )));
        }
    };

    let rows: Vec<_> = rows.into_iter().map(StoredRow::into_row).collect();
    match export::render_csv(&rows) {
        Ok(data) => Ok(CsvResponse {
            data,
            filename: export::export_file_name(),
        }),
        Err(e) => {
            error!("Failed to render results export: {}", e);
            Err(Json(StandardErrorResponse::new(
                "Failed to render CSV export".to_string(),
                "EXPORT_ERROR".to_string(),
                vec!["Try again in a few moments".to_string()],
            )))
        }
    }
}

/// Serve a previously written batch export by file name.
pub async fn download_export_handler(
    file: String,
    environment: &State<EnvironmentConfig>,
) -> Result<CsvResponse, Status> {
    // Only bare file names; no traversal out of the export directory.
    if file.contains('/') || file.contains('\\') || file.contains("..") {
        return Err(Status::BadRequest);
    }

    let path = environment.export_path.join(&file);
    match tokio::fs::read(&path).await {
        Ok(data) => Ok(CsvResponse {
            data,
            filename: file,
        }),
        Err(_) => Err(Status::NotFound),
    }
}
