//! API Routes
//!
//! Configures the Axum router with all cache endpoints.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    add_handler, health_handler, read_handler, reload_handler, remove_handler, stats_handler,
    update_handler, values_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /api/cache?key=` - Read a value (empty on miss)
/// - `POST /api/cache` - Store a value with optional lifetime
/// - `PUT /api/cache` - Update in place (not supported, 501)
/// - `DELETE /api/cache?key=` - Remove a key
/// - `GET /api/cache/values` - Mirror snapshot
/// - `POST /api/cache/reload` - Rebuild the mirror from the store
/// - `GET /stats` - Cache statistics
/// - `GET /health` - Health check endpoint
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            "/api/cache",
            get(read_handler)
                .post(add_handler)
                .put(update_handler)
                .delete(remove_handler),
        )
        .route("/api/cache/values", get(values_handler))
        .route("/api/cache/reload", post(reload_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
