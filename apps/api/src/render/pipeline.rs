//! Document generation: compile → fill template → reserve name → two LaTeX passes.
//!
//! The second pass resolves cross-references written by the first. A failure on
//! either pass is fatal and carries the compiler log. Auxiliary files are removed
//! only after a successful run; the `.tex` source is always kept.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::io::AsyncWriteExt;
use tracing::{error, info, warn};

use crate::latex::{compile_resume, SectionTable};
use crate::render::compiler::TexCompiler;
use crate::render::naming::{reserve_artifact_name, ArtifactMetadata};
use crate::render::template::{fill_template, TemplateProvider};
use crate::render::CompileError;

const COMPILE_PASSES: u8 = 2;
const AUX_EXTENSIONS: [&str; 3] = ["aux", "log", "out"];

/// Everything generation needs, cheap to clone into handlers.
#[derive(Clone)]
pub struct RenderContext {
    pub output_dir: PathBuf,
    pub sections: Arc<SectionTable>,
    pub compiler: Arc<dyn TexCompiler>,
    pub template: Arc<dyn TemplateProvider>,
}

#[derive(Debug, Clone)]
pub struct GeneratedArtifact {
    pub stem: String,
    pub tex_path: PathBuf,
    pub pdf_path: PathBuf,
}

impl GeneratedArtifact {
    pub fn pdf_file_name(&self) -> String {
        format!("{}.pdf", self.stem)
    }

    pub fn tex_file_name(&self) -> String {
        format!("{}.tex", self.stem)
    }
}

/// Generates a PDF for `resume_text` in the context's output directory.
pub async fn generate_document(
    ctx: &RenderContext,
    resume_text: &str,
    metadata: &ArtifactMetadata,
) -> Result<GeneratedArtifact, CompileError> {
    let document = compile_resume(resume_text, &ctx.sections);
    let template = ctx.template.load().await?;
    let source = fill_template(&template, &document.to_latex())?;

    tokio::fs::create_dir_all(&ctx.output_dir).await?;
    let output_dir = tokio::fs::canonicalize(&ctx.output_dir).await?;

    let mut reserved = reserve_artifact_name(&output_dir, metadata).await?;
    reserved.file.write_all(source.as_bytes()).await?;
    reserved.file.flush().await?;
    drop(reserved.file);

    info!(
        stem = %reserved.stem,
        sections = ?document.kinds(),
        "LaTeX source written"
    );

    for pass in 1..=COMPILE_PASSES {
        let output = ctx
            .compiler
            .run_pass(&reserved.tex_path, &output_dir)
            .await
            .inspect_err(|e| error!(stem = %reserved.stem, pass, "LaTeX pass aborted: {e}"))?;

        if !output.success {
            error!(stem = %reserved.stem, pass, "LaTeX pass failed");
            return Err(CompileError::Failure {
                pass,
                log: output.log,
            });
        }
        info!(stem = %reserved.stem, pass, "LaTeX pass completed");
    }

    if !tokio::fs::try_exists(&reserved.pdf_path).await? {
        error!(stem = %reserved.stem, "compiler exited cleanly but produced no PDF");
        return Err(CompileError::MissingArtifact(reserved.pdf_path));
    }

    remove_auxiliary_files(&output_dir, &reserved.stem).await;

    info!(pdf = %reserved.pdf_path.display(), "resume generated");
    Ok(GeneratedArtifact {
        stem: reserved.stem,
        tex_path: reserved.tex_path,
        pdf_path: reserved.pdf_path,
    })
}

async fn remove_auxiliary_files(output_dir: &Path, stem: &str) {
    for ext in AUX_EXTENSIONS {
        let path = output_dir.join(format!("{stem}.{ext}"));
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!(path = %path.display(), "could not remove auxiliary file: {e}"),
        }
    }
}
