use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::debug;

use super::limiter::PolicyLimiter;
use crate::errors::Fault;
use crate::metrics::registry::RATE_LIMIT_REJECTIONS_TOTAL;

/// Route layer admitting a request only if its policy grants a permit.
///
/// Attach with `middleware::from_fn_with_state(limiter, enforce_rate_limit)`.
pub async fn enforce_rate_limit(
    State(limiter): State<Arc<PolicyLimiter>>,
    request: Request,
    next: Next,
) -> Response {
    if limiter.acquire().await {
        return next.run(request).await;
    }

    let policy = limiter.policy().name();
    debug!(policy, path = %request.uri().path(), "Rate limit exceeded");
    RATE_LIMIT_REJECTIONS_TOTAL
        .with_label_values(&[policy])
        .inc();

    Fault::RateLimited {
        policy: policy.to_string(),
    }
    .into_response()
}
