//! Route table for the HTTP server.

use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use super::handlers;
use super::state::AppState;
use crate::uploads::UPLOADS_URL_PREFIX;

/// Build the application router.
pub fn build_routes(state: AppState) -> Router {
    let uploads = ServeDir::new(state.uploads.uploads_dir());

    Router::new()
        .route("/", get(handlers::form).post(handlers::submit))
        .route("/view/{id}", get(handlers::view))
        .route("/download/{id}", get(handlers::download))
        .route("/debug/{id}", get(handlers::debug_view))
        .route("/healthz", get(handlers::healthz))
        .nest_service(UPLOADS_URL_PREFIX, uploads)
        .layer(DefaultBodyLimit::max(state.max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
