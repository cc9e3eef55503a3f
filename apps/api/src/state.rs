use crate::config::Config;
use crate::render::RenderContext;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Section aliases, compiler and template used by every render.
    pub render: RenderContext,
}
