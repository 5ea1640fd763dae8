//! API Routes
//!
//! Configures the Axum router with all catalog endpoints.

use axum::{
    routing::{get, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    all_handler, clear_filters_handler, clear_recent_handler, detail_handler,
    filter_options_handler, health_handler, last_page_handler, page_handler, recent_handler,
    set_page_handler, stats_handler, update_filters_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /pokemon` - Current page for the active filters
/// - `GET /pokemon/all` - Every cached entity
/// - `GET /pokemon/:key` - Entity detail by id or name
/// - `PUT /filters` / `DELETE /filters` - Update or clear filters
/// - `GET /filters/options` - Type and generation choices
/// - `PUT /page/:page` - Navigate
/// - `PUT /last-page` - Jump to the last page
/// - `GET /recent` / `DELETE /recent` - Recently visited entities
/// - `GET /stats` - Cache statistics
/// - `GET /health` - Health check endpoint
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
        .route("/pokemon", get(page_handler))
        .route("/pokemon/all", get(all_handler))
        .route("/pokemon/:key", get(detail_handler))
        .route(
            "/filters",
            put(update_filters_handler).delete(clear_filters_handler),
        )
        .route("/filters/options", get(filter_options_handler))
        .route("/page/:page", put(set_page_handler))
        .route("/last-page", put(last_page_handler))
        .route("/recent", get(recent_handler).delete(clear_recent_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
