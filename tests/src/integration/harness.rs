//! Test gateway over a temporary data directory.

use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{Request, StatusCode};
use axum::Router;
use doc_gateway::domain::config::LimitsConfig;
use doc_gateway::{build_router, GatewayMetrics};
use doc_store::{DocumentService, FileDocumentStore, ValidationLimits};
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

pub const BOUNDARY: &str = "integration-boundary";

pub struct TestGateway {
    pub router: Router,
    pub service: Arc<DocumentService<FileDocumentStore>>,
    pub metrics: Arc<GatewayMetrics>,
    pub dir: TempDir,
}

impl TestGateway {
    pub fn new() -> Self {
        Self::with_limits(LimitsConfig::default(), true)
    }

    pub fn with_limits(limits: LimitsConfig, normalize_uploads: bool) -> Self {
        let dir = TempDir::new().unwrap();
        Self::open(dir, limits, normalize_uploads)
    }

    /// Build a fresh gateway over an existing directory, as after a restart.
    pub fn open(dir: TempDir, limits: LimitsConfig, normalize_uploads: bool) -> Self {
        let store = FileDocumentStore::open(dir.path()).unwrap();
        let validation: ValidationLimits = limits.validation_limits();
        let service = Arc::new(DocumentService::new(store, validation, normalize_uploads));
        let metrics = Arc::new(GatewayMetrics::new());
        let router = build_router(service.clone(), Arc::clone(&metrics), &limits);
        Self {
            router,
            service,
            metrics,
            dir,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, bytes.to_vec())
    }

    pub async fn send_json(&self, request: Request<Body>) -> (StatusCode, Value) {
        let (status, bytes) = self.send(request).await;
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    pub async fn get(&self, id: &str) -> (StatusCode, Value) {
        self.send_json(get(&format!("/api/data?id={id}"))).await
    }

    pub async fn replace(&self, id: &str, body: &Value) -> (StatusCode, Value) {
        self.send_json(post_json(&format!("/api/data?id={id}"), body.to_string()))
            .await
    }

    pub async fn undo(&self, id: &str) -> (StatusCode, Value) {
        self.send_json(post_json(&format!("/api/undo?id={id}"), String::new()))
            .await
    }

    /// Upload `content` and return the assigned id.
    pub async fn upload(&self, content: &[u8]) -> String {
        let (status, body) = self.send_json(multipart("file", content)).await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body["id"].as_str().unwrap().to_string()
    }
}

pub fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

pub fn post_json(uri: &str, body: String) -> Request<Body> {
    Request::post(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap()
}

pub fn multipart(field: &str, content: &[u8]) -> Request<Body> {
    let mut body = format!(
        "--{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"{field}\"; filename=\"upload.json\"\r\n\
         Content-Type: application/json\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::post("/api/upload")
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}
