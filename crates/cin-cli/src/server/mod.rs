//! HTTP service exposing card extraction.

mod handlers;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use cin_core::CardPipeline;

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<CardPipeline>,
}

/// Build the service router.
pub fn router(pipeline: Arc<CardPipeline>, max_upload_bytes: usize) -> Router {
    let state = AppState { pipeline };

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/extract", post(handlers::extract))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
