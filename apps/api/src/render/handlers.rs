use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::latex::{compile_resume, SectionKind};
use crate::render::naming::ArtifactMetadata;
use crate::render::pipeline::generate_document;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct PreviewRequest {
    pub resume_text: String,
}

#[derive(Serialize)]
pub struct PreviewResponse {
    pub latex: String,
    pub sections: Vec<SectionKind>,
}

#[derive(Deserialize)]
pub struct RenderRequest {
    pub resume_text: String,
    #[serde(flatten)]
    pub metadata: ArtifactMetadata,
}

#[derive(Serialize)]
pub struct RenderResponse {
    pub pdf_file: String,
    pub tex_file: String,
    pub generated_at: DateTime<Utc>,
}

fn require_text(text: &str) -> Result<(), AppError> {
    if text.trim().is_empty() {
        return Err(AppError::Validation("resume_text must not be empty".into()));
    }
    Ok(())
}

/// POST /api/v1/render/preview
/// Returns the assembled LaTeX body without invoking the toolchain.
pub async fn handle_preview(
    State(state): State<AppState>,
    Json(req): Json<PreviewRequest>,
) -> Result<Json<PreviewResponse>, AppError> {
    require_text(&req.resume_text)?;
    let document = compile_resume(&req.resume_text, &state.render.sections);
    Ok(Json(PreviewResponse {
        latex: document.to_latex(),
        sections: document.kinds(),
    }))
}

/// POST /api/v1/render
pub async fn handle_render(
    State(state): State<AppState>,
    Json(req): Json<RenderRequest>,
) -> Result<Json<RenderResponse>, AppError> {
    require_text(&req.resume_text)?;
    let artifact = generate_document(&state.render, &req.resume_text, &req.metadata).await?;
    Ok(Json(RenderResponse {
        pdf_file: artifact.pdf_file_name(),
        tex_file: artifact.tex_file_name(),
        generated_at: Utc::now(),
    }))
}

/// Only bare `<name>.pdf` / `<name>.tex` names inside the output directory are served.
fn content_type_for(filename: &str) -> Option<&'static str> {
    if filename.is_empty()
        || filename.starts_with('.')
        || filename.contains(['/', '\\'])
        || filename.contains("..")
    {
        return None;
    }
    match filename.rsplit_once('.')?.1 {
        "pdf" => Some("application/pdf"),
        "tex" => Some("application/x-tex"),
        _ => None,
    }
}

/// GET /api/v1/download/:filename
pub async fn handle_download(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let content_type = content_type_for(&filename)
        .ok_or_else(|| AppError::Validation(format!("invalid file name: {filename}")))?;

    let path = state.render.output_dir.join(&filename);
    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(AppError::NotFound(format!("file {filename} not found")))
        }
        Err(e) => return Err(AppError::Internal(e.into())),
    };

    info!(file = %filename, size = bytes.len(), "serving artifact");
    Ok((
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    ))
}
