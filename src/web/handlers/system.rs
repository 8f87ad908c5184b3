// src/web/handlers/system.rs
use crate::store::ResultStore;
use crate::web::types::{StandardErrorResponse, TextResponse};
use rocket::serde::json::Json;
use rocket::State;
use tracing::error;

pub async fn health_handler(
    store: &State<ResultStore>,
) -> Result<Json<TextResponse>, Json<StandardErrorResponse>> {
    match store.health_check().await {
        Ok(()) => Ok(Json(TextResponse::success("OK".to_string()))),
        Err(e) => {
            error!("Health check failed: {}", e);
            Err(Json(StandardErrorResponse::new(
                "Results store is unreachable".to_string(),
                "STORE_UNAVAILABLE".to_string(),
                vec!["Check the database path and permissions".to_string()],
            )))
        }
    }
}
