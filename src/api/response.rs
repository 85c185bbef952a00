use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Generic API response wrapper for the success path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Creation time, serialized as dd-MM-yyyy HH:mm:ss (UTC)
    #[serde(with = "crate::utils::timestamp")]
    pub timestamp: DateTime<Utc>,
    /// HTTP status code
    pub status: u16,
    /// Human-readable outcome
    pub message: String,
    /// Payload, `null` when absent
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Build a success body stamped with the current instant
    pub fn build_success(message: impl Into<String>, data: Option<T>, status: StatusCode) -> Self {
        Self {
            timestamp: Utc::now(),
            status: status.as_u16(),
            message: message.into(),
            data,
        }
    }

    /// 200 OK
    pub fn success(message: impl Into<String>, data: Option<T>) -> Self {
        Self::build_success(message, data, StatusCode::OK)
    }

    /// 201 Created
    pub fn created(message: impl Into<String>, data: Option<T>) -> Self {
        Self::build_success(message, data, StatusCode::CREATED)
    }

    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status).unwrap_or(StatusCode::OK)
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self)).into_response()
    }
}
