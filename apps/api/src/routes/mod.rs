pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::render::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Render API
        .route("/api/v1/render", post(handlers::handle_render))
        .route("/api/v1/render/preview", post(handlers::handle_preview))
        .route(
            "/api/v1/download/:filename",
            get(handlers::handle_download),
        )
        .with_state(state)
}
