//! Gateway error types and their HTTP mapping.
//!
//! Every failed request gets a JSON body:
//!
//! ```json
//! { "status": "error", "message": "..." }
//! ```
//!
//! Client mistakes map to 4xx with a descriptive message. Storage failures
//! map to 500; the cause is logged and the client sees a generic message.

use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::rejection::{BytesRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use doc_store::DocumentError;
use serde::Serialize;
use std::fmt;
use tracing::error;

/// Message returned for missing or empty `id` query parameters.
pub const MISSING_ID: &str = "Missing 'id' parameter";

/// HTTP-facing error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// Response status
    pub status: StatusCode,
    /// Client-visible message
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn payload_too_large(limit_bytes: usize) -> Self {
        Self::new(
            StatusCode::PAYLOAD_TOO_LARGE,
            format!("Payload exceeds the {limit_bytes} byte limit"),
        )
    }

    /// Generic 500; the cause must be logged by the caller.
    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    }

    pub fn missing_id() -> Self {
        Self::bad_request(MISSING_ID)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.status.as_u16(), self.message)
    }
}

impl std::error::Error for ApiError {}

#[derive(Serialize)]
struct ErrorBody<'a> {
    status: &'static str,
    message: &'a str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            status: "error",
            message: &self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<DocumentError> for ApiError {
    fn from(e: DocumentError) -> Self {
        match e {
            DocumentError::InvalidIdentifier(e) => {
                Self::bad_request(format!("Invalid 'id' parameter: {e}"))
            }
            DocumentError::MalformedInput(detail) => {
                Self::bad_request(format!("Invalid JSON format: {detail}"))
            }
            DocumentError::Validation(e) => Self::bad_request(format!("Validation Error: {e}")),
            DocumentError::NotFound(_) => Self::not_found("File not found"),
            DocumentError::NoUndoAvailable(_) => Self::bad_request("No undo available"),
            DocumentError::Storage(e) => {
                error!(error = %e, "storage failure");
                Self::internal()
            }
        }
    }
}

impl From<BytesRejection> for ApiError {
    fn from(e: BytesRejection) -> Self {
        Self::new(e.status(), e.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(e: QueryRejection) -> Self {
        Self::new(e.status(), e.body_text())
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(e: MultipartRejection) -> Self {
        Self::new(e.status(), e.body_text())
    }
}

impl From<MultipartError> for ApiError {
    fn from(e: MultipartError) -> Self {
        Self::new(e.status(), e.body_text())
    }
}

/// Result type for handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// Gateway-level errors (startup and serving, not per-request)
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Server socket bind error
    #[error("server bind error on {addr}: {source}")]
    Bind {
        addr: std::net::SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// The HTTP server stopped with an error
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}
