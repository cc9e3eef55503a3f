//! LaTeX document templates.
//!
//! A template is a full LaTeX document containing exactly one
//! [`CONTENT_PLACEHOLDER`]; the assembled resume body replaces it.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::render::CompileError;

pub const CONTENT_PLACEHOLDER: &str = "{{RESUME_CONTENT}}";

/// The template shipped with the binary, used when no template file is configured.
pub const BUNDLED_TEMPLATE: &str = include_str!("../../templates/resume_template.tex");

#[async_trait]
pub trait TemplateProvider: Send + Sync {
    async fn load(&self) -> Result<String, CompileError>;
}

/// Reads the template from disk on every render, so edits apply without a restart.
pub struct FileTemplate {
    path: PathBuf,
}

impl FileTemplate {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl TemplateProvider for FileTemplate {
    async fn load(&self) -> Result<String, CompileError> {
        tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            CompileError::Template(format!("cannot read {}: {e}", self.path.display()))
        })
    }
}

/// An in-memory template.
pub struct StaticTemplate(String);

impl StaticTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self(template.into())
    }

    pub fn bundled() -> Self {
        Self::new(BUNDLED_TEMPLATE)
    }
}

#[async_trait]
impl TemplateProvider for StaticTemplate {
    async fn load(&self) -> Result<String, CompileError> {
        Ok(self.0.clone())
    }
}

/// Substitutes `body` for the placeholder.
pub fn fill_template(template: &str, body: &str) -> Result<String, CompileError> {
    match template.matches(CONTENT_PLACEHOLDER).count() {
        1 => Ok(template.replacen(CONTENT_PLACEHOLDER, body, 1)),
        0 => Err(CompileError::Template(format!(
            "template has no {CONTENT_PLACEHOLDER} placeholder"
        ))),
        n => Err(CompileError::Template(format!(
            "template has {n} {CONTENT_PLACEHOLDER} placeholders, expected one"
        ))),
    }
}
