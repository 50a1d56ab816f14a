//! API handlers for the proposal server
//!
//! Store and PDF work is blocking, so every handler that touches either runs
//! it on the blocking pool.

use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartRejection, rejection::JsonRejection, Multipart, Path, State},
    http::{header, HeaderValue},
    response::{Html, IntoResponse, Response},
    Json,
};
use chrono::Local;
use proposal_store::{Area, StoreError};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::index::render_index;
use crate::models::{
    ExportRequest, ExportResponse, GenerateCoverRequest, GenerateCoverResponse, HealthResponse,
    UploadResponse,
};
use crate::state::AppState;

/// Multipart field carrying uploaded modules
const UPLOAD_FIELD: &str = "files";

async fn blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await?
}

/// Handler: GET /health
pub async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "proposal-server",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Handler: GET /
pub async fn handle_index(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let store = Arc::clone(&state.store);
    let modules = blocking(move || Ok(store.list_modules()?)).await?;
    let today = Local::now().format("%Y-%m-%d").to_string();
    let show_logo = state.static_dir.join("logo.png").is_file();

    Ok(Html(
        render_index(&modules, &state.brand_primary, &today, show_logo).into_string(),
    ))
}

/// Handler: GET /list_modules
pub async fn handle_list_modules(
    State(state): State<AppState>,
) -> Result<Json<Vec<String>>, ApiError> {
    let store = Arc::clone(&state.store);
    let modules = blocking(move || Ok(store.list_modules()?)).await?;
    Ok(Json(modules))
}

/// Handler: POST /upload
pub async fn handle_upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut multipart = multipart?;

    let mut uploads = Vec::new();
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let Some(file_name) = field.file_name().map(str::to_string) else {
            debug!("Ignoring upload part without a file name");
            continue;
        };
        let bytes = field.bytes().await?;
        uploads.push((file_name, bytes));
    }

    let store = Arc::clone(&state.store);
    let (saved, all) = blocking(move || {
        let mut saved = Vec::new();
        for (name, bytes) in uploads {
            if let Some(stored) = store.save_module(&name, &bytes)? {
                saved.push(stored);
            }
        }
        Ok((saved, store.list_modules()?))
    })
    .await?;

    info!("Upload stored {} module(s)", saved.len());
    Ok(Json(UploadResponse { saved, all }))
}

/// Handler: POST /generate_cover
pub async fn handle_generate_cover(
    State(state): State<AppState>,
    payload: Result<Json<GenerateCoverRequest>, JsonRejection>,
) -> Result<Json<GenerateCoverResponse>, ApiError> {
    let Json(req) = payload?;
    let meta = req.into_metadata();
    debug!("Cover request: {:?}", meta);

    let covers = state.covers.clone();
    let cover = blocking(move || covers.generate(&meta)).await?;
    Ok(Json(GenerateCoverResponse { cover }))
}

/// Handler: POST /export
pub async fn handle_export(
    State(state): State<AppState>,
    payload: Result<Json<ExportRequest>, JsonRejection>,
) -> Result<Json<ExportResponse>, ApiError> {
    let Json(req) = payload?;
    info!(
        "Export request: cover={:?}, {} module(s)",
        req.cover,
        req.files.len()
    );

    let exports = state.exports.clone();
    let export = blocking(move || exports.export(req.cover.as_deref(), &req.files)).await?;
    Ok(Json(ExportResponse { export }))
}

/// Handler: GET /download/:area/:filename
pub async fn handle_download(
    State(state): State<AppState>,
    Path((area, filename)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let area: Area = area.parse()?;

    let store = Arc::clone(&state.store);
    let name = filename.clone();
    let bytes = blocking(move || match store.read(area, &name) {
        Ok(bytes) => Ok(bytes),
        Err(StoreError::NotFound(_)) => Err(ApiError::NotFound(format!(
            "No file '{}' in {}",
            name, area
        ))),
        Err(e) => Err(e.into()),
    })
    .await?;

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("application/pdf")),
            (header::CONTENT_DISPOSITION, attachment_disposition(&filename)),
        ],
        bytes,
    )
        .into_response())
}

/// `attachment; filename="..."` with the name reduced to header-safe ASCII.
pub fn attachment_disposition(filename: &str) -> HeaderValue {
    let safe: String = filename
        .chars()
        .filter(|c| (c.is_ascii_graphic() || *c == ' ') && *c != '"' && *c != '\\')
        .collect();
    HeaderValue::from_str(&format!("attachment; filename=\"{}\"", safe))
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"))
}
