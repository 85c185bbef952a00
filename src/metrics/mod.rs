pub mod middleware;
pub mod registry;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use prometheus::{Encoder, TextEncoder};

/// Prometheus scrape endpoint
#[utoipa::path(
    get,
    path = "/actuator/prometheus",
    tag = "actuator",
    responses(
        (status = 200, description = "Metrics in Prometheus text exposition format", body = String),
        (status = 429, description = "Actuator rate limit exceeded", body = crate::errors::ErrorResponse)
    )
)]
pub async fn metrics_handler() -> Response {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    let mut buffer = Vec::new();
    match encoder.encode(&metric_families, &mut buffer) {
        Ok(_) => {
            let body = String::from_utf8(buffer).unwrap_or_else(|_| String::from(""));
            (
                StatusCode::OK,
                [("Content-Type", encoder.format_type())],
                body,
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("Failed to encode metrics: {}", e);
            crate::errors::Fault::Unknown(anyhow::anyhow!("failed to encode metrics: {}", e))
                .into_response()
        }
    }
}

pub use registry::{
    FAULTS_TOTAL, HTTP_REQUESTS_TOTAL, HTTP_REQUEST_DURATION_SECONDS, RATE_LIMIT_REJECTIONS_TOTAL,
};
