// src/web/mod.rs
pub mod handlers;
pub mod types;

pub use types::*;

use crate::environment::EnvironmentConfig;
use crate::oracle::OpenAiOracle;
use crate::store::ResultStore;
use anyhow::Result;
use rocket::data::{Limits, ToByteUnit};
use rocket::fairing::{Fairing, Info, Kind};
use rocket::form::Form;
use rocket::http::{Header, Status};
use rocket::serde::json::Json;
use rocket::{catchers, get, options, post, routes, Request, Response, State};
use tracing::info;

// CORS Fairing
pub struct Cors;

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "Add CORS headers to responses",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, _request: &'r Request<'_>, response: &mut Response<'r>) {
        response.set_header(Header::new("Access-Control-Allow-Origin", "*"));
        response.set_header(Header::new(
            "Access-Control-Allow-Methods",
            "POST, GET, OPTIONS",
        ));
        response.set_header(Header::new("Access-Control-Allow-Headers", "*"));
    }
}

#[post("/screen", data = "<form>")]
pub async fn screen(
    form: Form<ScreenForm<'_>>,
    environment: &State<EnvironmentConfig>,
    oracle: &State<OpenAiOracle>,
    store: &State<ResultStore>,
) -> Result<Json<DataResponse<ScreeningSummary>>, Json<StandardErrorResponse>> {
    handlers::screen_handler(form, environment, oracle, store).await
}

#[get("/results")]
pub async fn list_results(
    store: &State<ResultStore>,
) -> Result<Json<DataResponse<Vec<crate::store::StoredRow>>>, Json<StandardErrorResponse>> {
    handlers::list_results_handler(store).await
}

#[get("/results/export")]
pub async fn export_results(
    store: &State<ResultStore>,
) -> Result<CsvResponse, Json<StandardErrorResponse>> {
    handlers::export_results_handler(store).await
}

#[get("/exports/<file>")]
pub async fn download_export(
    file: String,
    environment: &State<EnvironmentConfig>,
) -> Result<CsvResponse, Status> {
    handlers::download_export_handler(file, environment).await
}

#[get("/health")]
pub async fn health(
    store: &State<ResultStore>,
) -> Result<Json<TextResponse>, Json<StandardErrorResponse>> {
    handlers::health_handler(store).await
}

#[options("/<_..>")]
pub async fn options() -> Status {
    Status::Ok
}

// Error catchers
#[rocket::catch(400)]
pub fn bad_request() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Invalid request format".to_string(),
        "BAD_REQUEST".to_string(),
        vec![
            "Check the multipart form fields".to_string(),
            "Verify all required fields are present".to_string(),
        ],
    ))
}

#[rocket::catch(500)]
pub fn internal_error() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Internal server error".to_string(),
        "INTERNAL_ERROR".to_string(),
        vec![
            "Try again in a few moments".to_string(),
            "Contact support if the problem persists".to_string(),
        ],
    ))
}

// Main server start function
pub async fn start_web_server(environment: EnvironmentConfig, oracle: OpenAiOracle) -> Result<()> {
    let store = ResultStore::new(&environment.database_path).await?;

    info!("Starting resume screening API server");
    info!("Database: {}", environment.database_path.display());
    info!("Exports: {}", environment.export_path.display());
    info!("Server: http://0.0.0.0:{}", environment.listen_port);

    let limits = Limits::default()
        .limit("file", 10.mebibytes())
        .limit("data-form", 60.mebibytes());

    let figment = rocket::Config::figment()
        .merge(("port", environment.listen_port))
        .merge(("address", "0.0.0.0"))
        .merge(("limits", limits));

    let _rocket = rocket::custom(figment)
        .attach(Cors)
        .manage(environment)
        .manage(oracle)
        .manage(store)
        .register("/api", catchers![bad_request, internal_error])
        .mount(
            "/api",
            routes![
                screen,
                list_results,
                export_results,
                download_export,
                health,
                options,
            ],
        )
        .launch()
        .await?;

    Ok(())
}
