//! Artifact naming.
//!
//! With full metadata the stem is `Person_Organization_Role_resume`, otherwise a
//! random UUID. A name is claimed by creating its `.tex` file with `create_new`, so
//! two requests racing on the same metadata can never both get it.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tokio::fs::{self, File, OpenOptions};
use tracing::debug;
use uuid::Uuid;

use crate::render::CompileError;

const MAX_NAME_ATTEMPTS: u32 = 1_000;

/// Optional identifying metadata used to name the output files.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArtifactMetadata {
    pub user_name: Option<String>,
    pub company: Option<String>,
    pub job_title: Option<String>,
}

/// Keeps word characters, whitespace and hyphens; collapses whitespace runs into `_`.
pub fn sanitize_component(raw: &str) -> String {
    let kept: String = raw
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-' || c.is_whitespace())
        .collect();
    kept.split_whitespace().collect::<Vec<_>>().join("_")
}

impl ArtifactMetadata {
    /// `Person_Organization_Role_resume`, or `None` unless all three components survive
    /// sanitizing.
    pub fn base_name(&self) -> Option<String> {
        let parts = [&self.user_name, &self.company, &self.job_title]
            .into_iter()
            .map(|p| p.as_deref().map(sanitize_component).filter(|s| !s.is_empty()))
            .collect::<Option<Vec<_>>>()?;
        Some(format!("{}_resume", parts.join("_")))
    }
}

/// A claimed output name. The `.tex` file already exists (empty) and `file` is open
/// for writing.
#[derive(Debug)]
pub struct ReservedName {
    pub stem: String,
    pub tex_path: PathBuf,
    pub pdf_path: PathBuf,
    pub file: File,
}

fn candidate(base: Option<&str>, attempt: u32) -> String {
    match (base, attempt) {
        (Some(base), 0) => base.to_string(),
        (Some(base), n) => format!("{base}_{n}"),
        (None, _) => Uuid::new_v4().to_string(),
    }
}

/// Claims the first free stem in `output_dir`.
///
/// A stem is free when neither `<stem>.pdf` exists nor `<stem>.tex` can be found
/// at the moment of exclusive creation.
pub async fn reserve_artifact_name(
    output_dir: &Path,
    metadata: &ArtifactMetadata,
) -> Result<ReservedName, CompileError> {
    let base = metadata.base_name();

    for attempt in 0..MAX_NAME_ATTEMPTS {
        let stem = candidate(base.as_deref(), attempt);
        let tex_path = output_dir.join(format!("{stem}.tex"));
        let pdf_path = output_dir.join(format!("{stem}.pdf"));

        if fs::try_exists(&pdf_path).await? {
            debug!(stem = %stem, "artifact name taken (pdf exists)");
            continue;
        }

        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&tex_path)
            .await
        {
            Ok(file) => {
                return Ok(ReservedName {
                    stem,
                    tex_path,
                    pdf_path,
                    file,
                })
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                debug!(stem = %stem, "artifact name taken (tex exists)");
            }
            Err(e) => return Err(e.into()),
        }
    }

    Err(CompileError::NameExhausted(MAX_NAME_ATTEMPTS))
}
