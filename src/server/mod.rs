//! Web front end
//!
//! One HTML page with an upload form, plus a small JSON API for scripted
//! clients. Handlers share a read-only [`AppState`].

pub mod render;
pub mod routes;
pub mod state;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use state::{AppState, SharedState};

/// Build the router with every route and middleware attached
pub fn build_router(state: SharedState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        // Page
        .route("/", get(routes::pages::index))
        .route("/detect", post(routes::detect::detect_page))
        // API
        .route("/health", get(routes::health::health_check))
        .route("/api/classes", get(routes::health::list_classes))
        .route("/api/detect", post(routes::detect::detect_json))
        .with_state(state)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}
