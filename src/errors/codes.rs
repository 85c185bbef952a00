use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Error codes for structured API responses
///
/// The set is closed; every code carries a fixed remediation hint returned
/// to the caller as `suggestion`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Request body failed field validation
    InvalidRequest,

    /// Parameter could not be converted to the required type
    InvalidParameterType,

    /// Input violated one or more constraints
    ConstraintViolation,

    /// Required parameter was not supplied
    MissingParameter,

    /// Request body is not valid JSON for the target type
    MalformedJson,

    /// Argument value rejected
    InvalidArgument,

    /// Content type not accepted by the endpoint
    UnsupportedMediaType,

    /// Caller lacks permission
    AccessDenied,

    /// No route matches the request
    ResourceNotFound,

    /// Route exists but not for this HTTP method
    MethodNotAllowed,

    /// Internal server error
    InternalError,

    /// Too many requests / rate limit exceeded
    RateLimitExceeded,
}

impl ErrorCode {
    pub const ALL: [ErrorCode; 12] = [
        Self::InvalidRequest,
        Self::InvalidParameterType,
        Self::ConstraintViolation,
        Self::MissingParameter,
        Self::MalformedJson,
        Self::InvalidArgument,
        Self::UnsupportedMediaType,
        Self::AccessDenied,
        Self::ResourceNotFound,
        Self::MethodNotAllowed,
        Self::InternalError,
        Self::RateLimitExceeded,
    ];

    /// Wire name of the code
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidRequest => "INVALID_REQUEST",
            Self::InvalidParameterType => "INVALID_PARAMETER_TYPE",
            Self::ConstraintViolation => "CONSTRAINT_VIOLATION",
            Self::MissingParameter => "MISSING_PARAMETER",
            Self::MalformedJson => "MALFORMED_JSON",
            Self::InvalidArgument => "INVALID_ARGUMENT",
            Self::UnsupportedMediaType => "UNSUPPORTED_MEDIA_TYPE",
            Self::AccessDenied => "ACCESS_DENIED",
            Self::ResourceNotFound => "RESOURCE_NOT_FOUND",
            Self::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            Self::InternalError => "INTERNAL_ERROR",
            Self::RateLimitExceeded => "RATE_LIMIT_EXCEEDED",
        }
    }

    /// User-facing remediation hint for this code
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::InvalidRequest => "Please review the validation errors and correct your request.",
            Self::InvalidParameterType => {
                "Please ensure the parameter value matches the required type."
            }
            Self::ConstraintViolation => {
                "Please check the input constraints in the API documentation."
            }
            Self::MissingParameter => {
                "Please include all required parameters as specified in the documentation."
            }
            Self::MalformedJson => "Please verify the JSON syntax and data types in your request.",
            Self::InvalidArgument => {
                "Please check the argument values against the API specifications."
            }
            Self::UnsupportedMediaType => {
                "Please use one of the supported media types for this endpoint."
            }
            Self::AccessDenied => {
                "Please ensure you have the necessary permissions or authenticate properly."
            }
            Self::ResourceNotFound => {
                "Please verify the requested resource exists and the URL is correct."
            }
            Self::MethodNotAllowed => {
                "Please use one of the supported HTTP methods for this endpoint."
            }
            Self::InternalError => {
                "Please try again later or contact support if the issue persists."
            }
            Self::RateLimitExceeded => {
                "Please wait and try your request again later. Contact support if you need a higher rate limit."
            }
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
