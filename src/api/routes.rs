use axum::{
    http::Uri,
    middleware,
    routing::get,
    Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{health, info, test, test_error, test_server_error, AppState};
use super::middleware::logging_middleware;
use super::openapi::swagger_ui;
use crate::errors::dispatcher::{handle_faults, panic_to_fault};
use crate::errors::Fault;
use crate::metrics;
use crate::ratelimit::{enforce_rate_limit, RateLimitError, ACTUATOR, STANDARD_API, TEST_ERROR};

/// Build the application router.
///
/// Fails only if a route names a rate limit policy the registry lacks.
pub fn create_router(state: AppState) -> Result<Router, RateLimitError> {
    let standard_api = state.rate_limiters.limiter(STANDARD_API)?;
    let test_error_limiter = state.rate_limiters.limiter(TEST_ERROR)?;
    let actuator = state.rate_limiters.limiter(ACTUATOR)?;

    // A method-level policy replaces the group policy rather than stacking on it
    let api = Router::new()
        .route(
            "/test",
            get(test).route_layer(middleware::from_fn_with_state(
                standard_api,
                enforce_rate_limit,
            )),
        )
        .route(
            "/test-error",
            get(test_error).route_layer(middleware::from_fn_with_state(
                test_error_limiter.clone(),
                enforce_rate_limit,
            )),
        )
        .route(
            "/test-server-error",
            get(test_server_error).route_layer(middleware::from_fn_with_state(
                test_error_limiter,
                enforce_rate_limit,
            )),
        );

    let actuator_routes = Router::new()
        .route("/health", get(health))
        .route("/info", get(info))
        .route("/prometheus", get(metrics::metrics_handler))
        .route_layer(middleware::from_fn_with_state(actuator, enforce_rate_limit));

    let app = Router::new()
        .nest("/api/v1", api)
        .nest("/actuator", actuator_routes)
        // OpenAPI documentation
        .merge(swagger_ui())
        .fallback(not_found)
        .with_state(state);

    Ok(apply_middleware(app))
}

/// Wrap a finished router in the service middleware stack.
///
/// The router runs as a fallback service so fault rendering sees its final
/// responses, including the `Allow` header axum adds to a 405.
pub fn apply_middleware(app: Router) -> Router {
    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .fallback_service(app)
        // Order matters: panics become faults, faults become error bodies, then
        // compression -> logging -> metrics -> cors -> trace
        .layer(CatchPanicLayer::custom(panic_to_fault))
        .layer(middleware::from_fn(handle_faults))
        .layer(CompressionLayer::new())
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(metrics::middleware::track_http_metrics))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

async fn not_found(uri: Uri) -> Fault {
    Fault::NotFound {
        url: uri.path().to_string(),
    }
}
