//! API Routes
//!
//! Configures the Axum router with all cache service endpoints.

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    completion_handler, expire_handler, health_handler, lookup_handler, purge_handler,
    stats_handler, store_handler, templates_handler, validate_inputs_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/cache", put(store_handler))
        .route("/purge", post(purge_handler))
        .route("/cache/:key", get(lookup_handler).delete(expire_handler))
        .route("/inputs/validate", post(validate_inputs_handler))
        .route("/tasks/completed", post(completion_handler))
        .route("/video/templates", get(templates_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
