use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use super::codes::ErrorCode;

/// Fault raised by handler code with an explicit status and code
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ApplicationFault {
    message: String,
    status: StatusCode,
    code: ErrorCode,
}

impl ApplicationFault {
    /// Create a fault carrying `INTERNAL_ERROR` as its code
    pub fn new(message: impl Into<String>, status: StatusCode) -> Self {
        Self::with_code(message, status, ErrorCode::InternalError)
    }

    pub fn with_code(message: impl Into<String>, status: StatusCode, code: ErrorCode) -> Self {
        Self {
            message: message.into(),
            status,
            code,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }
}

/// A single failed field check on a request body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// A single violated constraint, addressed by property path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintViolation {
    pub path: String,
    pub message: String,
}

impl ConstraintViolation {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConstraintViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Every failure that can terminate a request.
///
/// Each variant carries only what its client-facing message needs. Returning
/// a `Fault` from a handler, extractor or middleware produces a placeholder
/// response; [`handle_faults`](super::dispatcher::handle_faults) renders the
/// final body.
#[derive(Debug, Error)]
pub enum Fault {
    #[error(transparent)]
    Application(#[from] ApplicationFault),

    #[error("validation failed for {} field(s)", .0.len())]
    Validation(Vec<FieldError>),

    #[error("parameter '{name}' is not a valid {expected}")]
    TypeMismatch { name: String, expected: String },

    #[error("{} constraint(s) violated", .0.len())]
    ConstraintViolation(Vec<ConstraintViolation>),

    #[error("required parameter '{0}' is missing")]
    MissingParameter(String),

    #[error("malformed JSON body: {0}")]
    MalformedJson(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("access denied: {0}")]
    AccessDenied(String),

    #[error("no route for '{url}'")]
    NotFound { url: String },

    #[error("method {method} not allowed")]
    MethodNotAllowed {
        method: String,
        /// `None` when the route did not advertise its methods
        supported: Option<Vec<String>>,
    },

    #[error("media type {content_type} not supported")]
    UnsupportedMediaType {
        content_type: String,
        supported: Vec<String>,
    },

    #[error("rate limit '{policy}' exceeded")]
    RateLimited { policy: String },

    #[error(transparent)]
    Unknown(#[from] anyhow::Error),
}

impl Fault {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Application(fault) => fault.status(),
            Self::Validation(_)
            | Self::TypeMismatch { .. }
            | Self::ConstraintViolation(_)
            | Self::MissingParameter(_)
            | Self::MalformedJson(_)
            | Self::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            Self::AccessDenied(_) => StatusCode::FORBIDDEN,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            Self::UnsupportedMediaType { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            Self::Unknown(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Application(fault) => fault.code(),
            Self::Validation(_) => ErrorCode::InvalidRequest,
            Self::TypeMismatch { .. } => ErrorCode::InvalidParameterType,
            Self::ConstraintViolation(_) => ErrorCode::ConstraintViolation,
            Self::MissingParameter(_) => ErrorCode::MissingParameter,
            Self::MalformedJson(_) => ErrorCode::MalformedJson,
            Self::InvalidArgument(_) => ErrorCode::InvalidArgument,
            Self::AccessDenied(_) => ErrorCode::AccessDenied,
            Self::NotFound { .. } => ErrorCode::ResourceNotFound,
            Self::MethodNotAllowed { .. } => ErrorCode::MethodNotAllowed,
            Self::UnsupportedMediaType { .. } => ErrorCode::UnsupportedMediaType,
            Self::RateLimited { .. } => ErrorCode::RateLimitExceeded,
            Self::Unknown(_) => ErrorCode::InternalError,
        }
    }
}

/// Response extension carrying a fault to the dispatcher
#[derive(Debug, Clone)]
pub(crate) struct RaisedFault(pub(crate) Arc<Fault>);

impl IntoResponse for Fault {
    fn into_response(self) -> Response {
        let mut response = self.status().into_response();
        response
            .extensions_mut()
            .insert(RaisedFault(Arc::new(self)));
        response
    }
}
