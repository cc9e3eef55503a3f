mod config;
mod errors;
mod latex;
mod render;
mod routes;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::latex::SectionTable;
use crate::render::{FileTemplate, PdfLatex, RenderContext, StaticTemplate, TemplateProvider};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resumake API v{}", env!("CARGO_PKG_VERSION"));

    tokio::fs::create_dir_all(&config.output_dir)
        .await
        .with_context(|| format!("cannot create output dir {}", config.output_dir.display()))?;
    info!("Writing artifacts to {}", config.output_dir.display());

    let template: Arc<dyn TemplateProvider> = if config.template_path.is_file() {
        info!("Using template {}", config.template_path.display());
        Arc::new(FileTemplate::new(&config.template_path))
    } else {
        warn!(
            "Template {} not found, using bundled template",
            config.template_path.display()
        );
        Arc::new(StaticTemplate::bundled())
    };

    let compiler = Arc::new(PdfLatex::new(&config.latex_bin, config.latex_timeout));
    info!(
        "LaTeX toolchain: {} (timeout {:?})",
        config.latex_bin, config.latex_timeout
    );

    let state = AppState {
        render: RenderContext {
            output_dir: config.output_dir.clone(),
            sections: Arc::new(SectionTable::default()),
            compiler,
            template,
        },
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
