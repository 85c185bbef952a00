use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::codes::ErrorCode;

/// Structured error response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Time the error was rendered (dd-MM-yyyy HH:mm:ss, UTC)
    #[serde(with = "crate::utils::timestamp")]
    #[schema(value_type = String, example = "18-10-2026 14:03:27")]
    pub timestamp: DateTime<Utc>,
    /// HTTP status code
    pub status: u16,
    /// HTTP reason phrase
    pub error: String,
    /// Error code for programmatic handling
    pub code: Option<ErrorCode>,
    /// Human-readable error message
    pub message: String,
    /// Description of the request URI
    pub path: String,
    /// Per-item details, e.g. one line per invalid field
    pub details: Vec<String>,
    /// How the caller can fix the request
    pub suggestion: Option<String>,
}

impl ErrorResponse {
    /// Create a new error response
    pub fn new(
        status: StatusCode,
        code: ErrorCode,
        message: impl Into<String>,
        path: impl Into<String>,
        details: Vec<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            status: status.as_u16(),
            error: reason_phrase(status),
            code: Some(code),
            message: message.into(),
            path: path.into(),
            details,
            suggestion: Some(code.suggestion().to_string()),
        }
    }

    /// Error body for a failure that carries no code, such as a bare
    /// framework rejection
    pub fn degraded(status: StatusCode, message: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            status: status.as_u16(),
            error: reason_phrase(status),
            code: None,
            message: message.into(),
            path: path.into(),
            details: Vec::new(),
            suggestion: None,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

fn reason_phrase(status: StatusCode) -> String {
    status.canonical_reason().unwrap_or("Unknown").to_string()
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self)).into_response()
    }
}
