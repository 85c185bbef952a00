use thiserror::Error;

/// Rate limiting configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RateLimitError {
    /// No policy registered under this name
    #[error("unknown rate limit policy '{0}'")]
    UnknownPolicy(String),

    /// Two policies share a name
    #[error("rate limit policy '{0}' is defined more than once")]
    DuplicatePolicy(String),

    /// Policy values cannot be turned into a quota
    #[error("invalid rate limit policy '{name}': {reason}")]
    InvalidPolicy { name: String, reason: String },
}
