//! HTTP routes and handlers.
//!
//! | Route | Operation |
//! |-------|-----------|
//! | `GET /api/data?id=X` | `DocumentApi::get` |
//! | `POST /api/data?id=X` | `DocumentApi::replace` |
//! | `POST /api/upload` | `DocumentApi::upload` (multipart field `file`) |
//! | `GET /api/download?id=X` | `DocumentApi::download` |
//! | `POST /api/undo?id=X` | `DocumentApi::undo` |
//! | `GET /health`, `GET /metrics` | liveness and counters |
//!
//! Document operations block on per-id locks, so they run on the blocking
//! pool. A started operation finishes even if the client goes away.

use crate::domain::config::LimitsConfig;
use crate::domain::error::{ApiError, ApiResult};
use crate::middleware::{GatewayMetrics, TracingLayer};
use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::rejection::{BytesRejection, QueryRejection};
use axum::extract::{DefaultBodyLimit, Multipart, Query, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use bytes::Bytes;
use doc_store::{Document, DocumentApi, DocumentError, DocumentId};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::error;

/// Multipart field carrying the uploaded file.
pub const UPLOAD_FIELD: &str = "file";

/// Allowance for multipart framing on top of the file size limit.
const MULTIPART_OVERHEAD: usize = 16 * 1024;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub documents: Arc<dyn DocumentApi>,
    pub metrics: Arc<GatewayMetrics>,
    /// Largest accepted uploaded file, in bytes
    pub max_upload_bytes: usize,
}

/// Build the HTTP router.
pub fn build_router(
    documents: Arc<dyn DocumentApi>,
    metrics: Arc<GatewayMetrics>,
    limits: &LimitsConfig,
) -> Router {
    let max_upload_bytes = limits.max_upload_bytes();
    let state = AppState {
        documents,
        metrics: Arc::clone(&metrics),
        max_upload_bytes,
    };

    Router::new()
        .route("/api/data", get(get_document).post(replace_document))
        .route(
            "/api/upload",
            post(upload_document).layer(DefaultBodyLimit::max(
                max_upload_bytes.saturating_add(MULTIPART_OVERHEAD),
            )),
        )
        .route("/api/download", get(download_document))
        .route("/api/undo", post(undo_document))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_snapshot))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TracingLayer::new(metrics))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct IdQuery {
    id: Option<String>,
}

impl IdQuery {
    fn document_id(&self) -> ApiResult<DocumentId> {
        let raw = self
            .id
            .as_deref()
            .filter(|raw| !raw.is_empty())
            .ok_or_else(ApiError::missing_id)?;
        DocumentId::parse(raw).map_err(|e| DocumentError::from(e).into())
    }
}

fn document_id(query: Result<Query<IdQuery>, QueryRejection>) -> ApiResult<DocumentId> {
    let Query(query) = query?;
    query.document_id()
}

/// Run a document operation on the blocking pool.
async fn run_blocking<T, F>(state: &AppState, op: F) -> ApiResult<T>
where
    T: Send + 'static,
    F: FnOnce(&dyn DocumentApi) -> Result<T, DocumentError> + Send + 'static,
{
    let documents = Arc::clone(&state.documents);
    match tokio::task::spawn_blocking(move || op(documents.as_ref())).await {
        Ok(result) => result.map_err(ApiError::from),
        Err(e) => {
            error!(error = %e, "document task failed");
            Err(ApiError::internal())
        }
    }
}

fn success() -> Json<Value> {
    Json(json!({ "status": "success" }))
}

async fn get_document(
    State(state): State<AppState>,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> ApiResult<Json<Document>> {
    let id = document_id(query)?;
    let document = run_blocking(&state, move |docs| docs.get(&id)).await?;
    Ok(Json(document))
}

async fn replace_document(
    State(state): State<AppState>,
    query: Result<Query<IdQuery>, QueryRejection>,
    body: Result<Bytes, BytesRejection>,
) -> ApiResult<Json<Value>> {
    let id = document_id(query)?;
    let body = body?;
    let document: Document = serde_json::from_slice(&body).map_err(DocumentError::from)?;

    run_blocking(&state, move |docs| docs.replace(&id, document)).await?;
    state.metrics.record_replace();
    Ok(success())
}

async fn upload_document(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<Value>> {
    let mut multipart = multipart?;

    let limit = state.max_upload_bytes;
    let too_large = |e: MultipartError| {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::payload_too_large(limit)
        } else {
            ApiError::from(e)
        }
    };

    let mut payload = None;
    while let Some(field) = multipart.next_field().await.map_err(too_large)? {
        if field.name() == Some(UPLOAD_FIELD) {
            payload = Some(field.bytes().await.map_err(too_large)?);
            break;
        }
    }

    let payload = payload.ok_or_else(|| ApiError::bad_request("Error retrieving file"))?;
    if payload.len() > state.max_upload_bytes {
        return Err(ApiError::payload_too_large(state.max_upload_bytes));
    }

    let id = run_blocking(&state, move |docs| docs.upload(&payload)).await?;
    state.metrics.record_upload();

    Ok(Json(json!({
        "status": "success",
        "message": "File uploaded and saved.",
        "id": id.as_str(),
    })))
}

async fn download_document(
    State(state): State<AppState>,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> ApiResult<Response> {
    let id = document_id(query)?;
    let filename = format!("attachment; filename=data_{id}.json");
    let document = run_blocking(&state, move |docs| docs.download(&id)).await?;

    let body = serde_json::to_vec_pretty(&document).map_err(|e| {
        error!(error = %e, "failed to encode download");
        ApiError::internal()
    })?;

    Ok((
        [
            (CONTENT_TYPE, "application/json".to_string()),
            (CONTENT_DISPOSITION, filename),
        ],
        body,
    )
        .into_response())
}

async fn undo_document(
    State(state): State<AppState>,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> ApiResult<Json<Value>> {
    let id = document_id(query)?;
    run_blocking(&state, move |docs| docs.undo(&id)).await?;
    state.metrics.record_undo();
    Ok(success())
}

async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn metrics_snapshot(State(state): State<AppState>) -> Json<Value> {
    Json(state.metrics.to_json())
}
