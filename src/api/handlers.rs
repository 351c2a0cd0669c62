use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::api::response::{attachment, ApiError};
use crate::api::state::AppState;
use crate::domain::entities::row::Row;
use crate::domain::entities::upload::{IngestResult, UploadFile, UploadRecord};
use crate::platform::blocking::run_blocking;
use crate::usecase::services::export_service::ExportFormat;

pub const UPLOAD_FIELD: &str = "files";

#[derive(Debug, Default, Deserialize)]
pub struct FormatQuery {
    format: Option<String>,
}

impl FormatQuery {
    fn parse(&self) -> Result<ExportFormat, ApiError> {
        match self.format.as_deref() {
            None | Some("") => Ok(ExportFormat::default()),
            Some(raw) => raw.parse().map_err(ApiError::invalid_request),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct TermQuery {
    #[serde(default)]
    term: String,
}

#[derive(Debug, Deserialize)]
pub struct ExportFilteredRequest {
    pub rows: Vec<Row>,
}

#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: String,
    #[serde(flatten)]
    pub result: IngestResult,
}

pub async fn healthz() -> Response {
    Json(json!({ "ok": true })).into_response()
}

pub async fn get_data(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Row>>, ApiError> {
    let rows = run_blocking(move || state.queries.all_rows()).await??;
    Ok(Json(rows))
}

pub async fn get_count(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CountResponse>, ApiError> {
    let total = run_blocking(move || state.queries.count()).await??;
    Ok(Json(CountResponse { total }))
}

pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TermQuery>,
) -> Result<Json<Vec<Row>>, ApiError> {
    let rows = run_blocking(move || state.queries.search_by_index(&query.term)).await??;
    Ok(Json(rows))
}

pub async fn filter(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TermQuery>,
) -> Result<Json<Vec<Row>>, ApiError> {
    let rows = run_blocking(move || state.queries.filter_any(&query.term)).await??;
    Ok(Json(rows))
}

pub async fn list_uploads(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<UploadRecord>>, ApiError> {
    let uploads = run_blocking(move || state.repo.uploads()).await??;
    Ok(Json(uploads))
}

pub async fn upload_multiple(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let max_files = state.imports.limits().max_files;
    let mut files = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| ApiError::invalid_request(format!("malformed multipart body: {err}")))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        if files.len() == max_files {
            return Err(ApiError::invalid_request(format!(
                "more than {max_files} files uploaded"
            )));
        }
        let name = field
            .file_name()
            .map(str::to_string)
            .unwrap_or_else(|| format!("file-{}", files.len() + 1));
        let bytes = field
            .bytes()
            .await
            .map_err(|err| ApiError::invalid_request(format!("failed to read {name}: {err}")))?;
        files.push(UploadFile::new(name, bytes.to_vec()));
    }

    let result = run_blocking(move || state.imports.ingest(files)).await??;
    let message = if result.errors.is_empty() {
        format!("Uploaded {} file(s)", result.files_processed)
    } else {
        format!(
            "Uploaded {} file(s); {} failed",
            result.files_processed,
            result.errors.len()
        )
    };
    Ok(Json(UploadResponse { message, result }))
}

pub async fn delete_all(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    run_blocking(move || state.repo.clear()).await??;
    tracing::info!("cleared consolidated store");
    Ok(Json(json!({ "message": "All data deleted" })).into_response())
}

pub async fn export_all(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FormatQuery>,
) -> Result<Response, ApiError> {
    let format = query.parse()?;
    let bytes = run_blocking(move || state.exports.export_all(format)).await??;
    Ok(attachment(bytes, format, "Consolidated_Data"))
}

pub async fn export_filtered(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FormatQuery>,
    payload: Result<Json<ExportFilteredRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let format = query.parse()?;
    let Json(request) = payload.map_err(|err| {
        ApiError::invalid_request(format!("malformed rows body: {}", err.body_text()))
    })?;
    let bytes =
        run_blocking(move || state.exports.export_subset(&request.rows, format)).await??;
    Ok(attachment(bytes, format, "Filtered_Results"))
}
