//! The single chokepoint turning faults into the canonical error body.
//!
//! [`dispatch`] is the pure fault → [`ErrorResponse`] table. [`handle_faults`]
//! is the middleware that applies it to everything below it in the router:
//! faults returned by handlers, extractors and route layers, framework 405
//! responses, and bare error responses nobody classified.

use axum::{
    extract::Request,
    http::{header, HeaderMap, StatusCode, Uri},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::any::Any;
use tracing::{error, warn};

use super::fault::{Fault, RaisedFault};
use super::response::ErrorResponse;
use crate::metrics::registry::FAULTS_TOTAL;

const VALIDATION_FAILED: &str = "Validation failed. Please check the provided data.";
const CONSTRAINTS_VIOLATED: &str = "Validation constraints violated. Please check your input.";
const MALFORMED_JSON: &str = "Malformed JSON request. Please check the request body.";
const ACCESS_DENIED: &str = "You don't have permission to access this resource";
const TOO_MANY_REQUESTS: &str = "Too many requests. Please try again later.";
const UNEXPECTED_ERROR: &str =
    "An unexpected error occurred. Please try again later or contact support if the problem persists.";
const NO_SUPPORTED_METHODS: &str = "No supported methods";

/// Largest unclassified error body read back when degrading it
const DEGRADED_BODY_LIMIT: usize = 64 * 1024;

/// Describe a request URI the way error bodies report it
pub fn describe_request(uri: &Uri) -> String {
    format!("uri={}", uri.path())
}

/// Map a fault to its error body
pub fn dispatch(fault: &Fault, path: &str) -> ErrorResponse {
    let (message, details) = render_message(fault);
    ErrorResponse::new(fault.status(), fault.code(), message, path, details)
}

fn render_message(fault: &Fault) -> (String, Vec<String>) {
    match fault {
        Fault::Application(fault) => (fault.message().to_string(), Vec::new()),
        Fault::Validation(errors) => (
            VALIDATION_FAILED.to_string(),
            errors.iter().map(ToString::to_string).collect(),
        ),
        Fault::TypeMismatch { name, expected } => (
            format!("The parameter '{}' must be a valid {}", name, expected),
            Vec::new(),
        ),
        Fault::ConstraintViolation(violations) => (
            CONSTRAINTS_VIOLATED.to_string(),
            violations.iter().map(ToString::to_string).collect(),
        ),
        Fault::MissingParameter(name) => (
            format!("The required parameter '{}' is missing", name),
            Vec::new(),
        ),
        Fault::MalformedJson(reason) => (MALFORMED_JSON.to_string(), vec![reason.clone()]),
        Fault::InvalidArgument(reason) => (reason.clone(), Vec::new()),
        Fault::AccessDenied(_) => (ACCESS_DENIED.to_string(), Vec::new()),
        Fault::NotFound { url } => (
            format!("The requested resource '{}' was not found", url),
            Vec::new(),
        ),
        Fault::MethodNotAllowed { method, supported } => {
            let supported = supported
                .as_ref()
                .filter(|methods| !methods.is_empty())
                .map(|methods| methods.join(", "))
                .unwrap_or_else(|| NO_SUPPORTED_METHODS.to_string());
            (
                format!(
                    "The {} method is not supported. Supported methods are: {}",
                    method, supported
                ),
                Vec::new(),
            )
        }
        Fault::UnsupportedMediaType {
            content_type,
            supported,
        } => (
            format!(
                "The media type {} is not supported. Supported types are: {}",
                content_type,
                supported.join(", ")
            ),
            Vec::new(),
        ),
        Fault::RateLimited { .. } => (TOO_MANY_REQUESTS.to_string(), Vec::new()),
        Fault::Unknown(_) => (UNEXPECTED_ERROR.to_string(), Vec::new()),
    }
}

/// Middleware rendering every fault raised below it
pub async fn handle_faults(request: Request, next: Next) -> Response {
    let path = describe_request(request.uri());
    let method = request.method().clone();

    let mut response = next.run(request).await;

    if let Some(RaisedFault(fault)) = response.extensions_mut().remove::<RaisedFault>() {
        return render(&fault, &path, response.headers());
    }

    let status = response.status();
    if status == StatusCode::METHOD_NOT_ALLOWED {
        let fault = Fault::MethodNotAllowed {
            method: method.to_string(),
            supported: allowed_methods(response.headers()),
        };
        return render(&fault, &path, response.headers());
    }

    if (status.is_client_error() || status.is_server_error()) && !is_json(response.headers()) {
        return degrade(response, &path).await;
    }

    response
}

fn render(fault: &Fault, path: &str, carried: &HeaderMap) -> Response {
    log_fault(fault, path);
    FAULTS_TOTAL
        .with_label_values(&[fault.code().as_str()])
        .inc();

    let mut response = dispatch(fault, path).into_response();
    if let Some(allow) = carried.get(header::ALLOW) {
        response.headers_mut().insert(header::ALLOW, allow.clone());
    }
    response
}

fn log_fault(fault: &Fault, path: &str) {
    let status = fault.status().as_u16();
    let code = fault.code();

    if fault.status().is_server_error() {
        error!(code = %code, status, path, error = ?fault, "Request failed with fault");
    } else {
        warn!(code = %code, status, path, error = %fault, "Request failed with fault");
    }
}

/// Methods advertised by the `Allow` header, `None` when absent or empty
fn allowed_methods(headers: &HeaderMap) -> Option<Vec<String>> {
    let methods: Vec<String> = headers
        .get_all(header::ALLOW)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .map(str::trim)
        .filter(|method| !method.is_empty())
        .map(str::to_string)
        .collect();

    if methods.is_empty() {
        None
    } else {
        Some(methods)
    }
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.starts_with("application/json"))
        .unwrap_or(false)
}

async fn degrade(response: Response, path: &str) -> Response {
    let status = response.status();
    let body = match axum::body::to_bytes(response.into_body(), DEGRADED_BODY_LIMIT).await {
        Ok(bytes) => String::from_utf8_lossy(&bytes).trim().to_string(),
        Err(_) => String::new(),
    };

    // Server error bodies stay in the logs
    let message = if status.is_server_error() {
        error!(status = status.as_u16(), path, body = %body, "Unclassified error response");
        UNEXPECTED_ERROR.to_string()
    } else {
        warn!(status = status.as_u16(), path, body = %body, "Unclassified error response");
        if body.is_empty() {
            status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string()
        } else {
            body
        }
    };

    FAULTS_TOTAL.with_label_values(&["UNCLASSIFIED"]).inc();

    ErrorResponse::degraded(status, message, path).into_response()
}

/// Panic hook for `CatchPanicLayer`, feeding panics into the dispatcher
pub fn panic_to_fault(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    Fault::Unknown(anyhow::anyhow!("handler panicked: {}", detail)).into_response()
}
