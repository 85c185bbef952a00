use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use utoipa::ToSchema;

use super::response::ApiResponse;
use crate::errors::{ApplicationFault, ErrorCode, Fault};
use crate::ratelimit::RateLimiterRegistry;

lazy_static::lazy_static! {
    static ref START_TIME: Instant = Instant::now();
}

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub rate_limiters: RateLimiterRegistry,
    pub instance_id: String,
}

// Concrete response types for OpenAPI generation
/// Success response carrying a text payload
#[derive(Debug, Serialize, ToSchema)]
pub struct TextResponse {
    /// Creation time (dd-MM-yyyy HH:mm:ss)
    #[schema(example = "18-10-2026 14:03:27")]
    pub timestamp: String,
    /// HTTP status code
    pub status: u16,
    /// Human-readable outcome
    pub message: String,
    /// Payload
    pub data: Option<String>,
}

/// Service health
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Always "UP" while the process serves requests
    pub status: String,
    pub service: String,
    pub version: String,
    pub instance_id: String,
    pub uptime_seconds: u64,
}

/// Application metadata
#[derive(Debug, Serialize, ToSchema)]
pub struct InfoResponse {
    pub name: String,
    pub description: String,
    pub version: String,
}

/// Smoke-test endpoint
#[utoipa::path(
    get,
    path = "/api/v1/test",
    tag = "test",
    responses(
        (status = 200, description = "Endpoint reachable", body = TextResponse),
        (status = 429, description = "Rate limit exceeded", body = crate::errors::ErrorResponse)
    )
)]
pub async fn test() -> ApiResponse<String> {
    ApiResponse::success(
        "Test endpoint executed successfully",
        Some("Hello, World!".to_string()),
    )
}

/// Always fails with a client error
#[utoipa::path(
    get,
    path = "/api/v1/test-error",
    tag = "test",
    responses(
        (status = 400, description = "Deliberate client error", body = crate::errors::ErrorResponse),
        (status = 429, description = "Rate limit exceeded", body = crate::errors::ErrorResponse)
    )
)]
pub async fn test_error() -> Result<ApiResponse<()>, Fault> {
    Err(ApplicationFault::with_code(
        "This is a test error",
        StatusCode::BAD_REQUEST,
        ErrorCode::InvalidRequest,
    )
    .into())
}

/// Always fails with a server error
#[utoipa::path(
    get,
    path = "/api/v1/test-server-error",
    tag = "test",
    responses(
        (status = 500, description = "Deliberate server error", body = crate::errors::ErrorResponse),
        (status = 429, description = "Rate limit exceeded", body = crate::errors::ErrorResponse)
    )
)]
pub async fn test_server_error() -> Result<ApiResponse<()>, Fault> {
    Err(ApplicationFault::new("This is a test server error", StatusCode::INTERNAL_SERVER_ERROR).into())
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/actuator/health",
    tag = "actuator",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 429, description = "Rate limit exceeded", body = crate::errors::ErrorResponse)
    )
)]
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "UP".to_string(),
        service: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        instance_id: state.instance_id.clone(),
        uptime_seconds: START_TIME.elapsed().as_secs(),
    })
}

/// Application info endpoint
#[utoipa::path(
    get,
    path = "/actuator/info",
    tag = "actuator",
    responses(
        (status = 200, description = "Application metadata", body = InfoResponse),
        (status = 429, description = "Rate limit exceeded", body = crate::errors::ErrorResponse)
    )
)]
pub async fn info() -> Json<InfoResponse> {
    Json(InfoResponse {
        name: env!("CARGO_PKG_NAME").to_string(),
        description: env!("CARGO_PKG_DESCRIPTION").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_returns_greeting() {
        let response = test().await;
        assert_eq!(response.status, 200);
        assert_eq!(response.message, "Test endpoint executed successfully");
        assert_eq!(response.data.as_deref(), Some("Hello, World!"));
    }

    #[tokio::test]
    async fn test_error_raises_invalid_request() {
        let fault = test_error().await.unwrap_err();
        assert_eq!(fault.status(), StatusCode::BAD_REQUEST);
        assert_eq!(fault.code(), ErrorCode::InvalidRequest);
        assert_eq!(fault.to_string(), "This is a test error");
    }

    #[tokio::test]
    async fn test_server_error_defaults_to_internal_error() {
        let fault = test_server_error().await.unwrap_err();
        assert_eq!(fault.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(fault.code(), ErrorCode::InternalError);
    }
}
