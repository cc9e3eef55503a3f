//! External LaTeX toolchain.
//!
//! [`TexCompiler`] runs one compilation pass. The pipeline decides how many passes
//! to run and what a failed pass means; implementations only report what happened.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::render::CompileError;

/// Outcome of a single pass that ran to completion within the timeout.
#[derive(Debug, Clone)]
pub struct PassOutput {
    pub success: bool,
    /// Compiler output (stdout, or stderr when stdout is empty).
    pub log: String,
}

#[async_trait]
pub trait TexCompiler: Send + Sync {
    /// Compiles `tex_path`, writing all outputs into `output_dir`.
    async fn run_pass(&self, tex_path: &Path, output_dir: &Path)
        -> Result<PassOutput, CompileError>;
}

/// `pdflatex` (or a compatible binary) in non-interactive mode.
pub struct PdfLatex {
    program: String,
    timeout: Duration,
}

impl PdfLatex {
    pub fn new(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }
}

#[async_trait]
impl TexCompiler for PdfLatex {
    async fn run_pass(
        &self,
        tex_path: &Path,
        output_dir: &Path,
    ) -> Result<PassOutput, CompileError> {
        let mut cmd = Command::new(&self.program);
        cmd.arg("-interaction=nonstopmode")
            .arg("-output-directory")
            .arg(output_dir)
            .arg(tex_path)
            .current_dir(output_dir)
            .stdin(Stdio::null())
            .kill_on_drop(true);

        debug!(program = %self.program, tex = %tex_path.display(), "spawning LaTeX pass");

        // kill_on_drop reaps the child when the timeout drops the future.
        let output = tokio::time::timeout(self.timeout, cmd.output())
            .await
            .map_err(|_| CompileError::Timeout(self.timeout))??;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let log = if stdout.trim().is_empty() {
            String::from_utf8_lossy(&output.stderr).into_owned()
        } else {
            stdout.into_owned()
        };

        Ok(PassOutput {
            success: output.status.success(),
            log,
        })
    }
}

#[cfg(all(test, unix))]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[tokio::test]
    async fn test_missing_binary_is_io_error() {
        let dir = TempDir::new().unwrap();
        let compiler = PdfLatex::new("definitely-not-a-latex-binary", Duration::from_secs(5));
        let err = compiler
            .run_pass(&dir.path().join("x.tex"), dir.path())
            .await
            .unwrap_err();
        assert!(matches!(err, CompileError::Io(_)));
    }

    #[tokio::test]
    async fn test_exit_status_reported() {
        let dir = TempDir::new().unwrap();
        let tex = dir.path().join("x.tex");

        let ok = PdfLatex::new("true", Duration::from_secs(5))
            .run_pass(&tex, dir.path())
            .await
            .unwrap();
        assert!(ok.success);

        let failed = PdfLatex::new("false", Duration::from_secs(5))
            .run_pass(&tex, dir.path())
            .await
            .unwrap();
        assert!(!failed.success);
    }

    #[tokio::test]
    async fn test_slow_compiler_times_out() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let script = dir.path().join("slow-latex.sh");
        std::fs::write(&script, "#!/bin/sh\nsleep 5\n").unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let limit = Duration::from_millis(100);
        let started = std::time::Instant::now();
        let err = PdfLatex::new(script.to_string_lossy(), limit)
            .run_pass(&dir.path().join("x.tex"), dir.path())
            .await
            .unwrap_err();

        assert!(matches!(err, CompileError::Timeout(d) if d == limit));
        assert!(started.elapsed() < Duration::from_secs(4));
    }
}
