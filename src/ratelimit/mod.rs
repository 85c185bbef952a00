//! Named rate limiting policies consulted before handlers run

pub mod error;
pub mod limiter;
pub mod middleware;
pub mod policy;

pub use error::RateLimitError;
pub use limiter::{PolicyLimiter, RateLimiterRegistry};
pub use middleware::enforce_rate_limit;
pub use policy::{default_policies, RateLimiterPolicy, ACTUATOR, STANDARD_API, TEST_ERROR};
