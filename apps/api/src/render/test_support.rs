// Test doubles for the compilation driver.

use std::path::Path;
use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::render::compiler::{PassOutput, TexCompiler};
use crate::render::CompileError;

#[derive(Debug, Clone, Copy)]
pub enum FakeBehavior {
    /// Writes `<stem>.pdf` plus auxiliary files on every pass.
    Succeed,
    /// Exits non-zero on the given pass (1-based).
    FailOnPass(u8),
    /// Exits zero without producing a PDF.
    NoArtifact,
    TimeOut,
}

pub const FAKE_FAILURE_LOG: &str = "! Undefined control sequence.\nl.12 \\badmacro";

/// Pretends to be pdflatex. Pass numbers count across calls.
pub struct FakeCompiler {
    behavior: FakeBehavior,
    passes: AtomicU8,
}

impl FakeCompiler {
    pub fn new(behavior: FakeBehavior) -> Self {
        Self {
            behavior,
            passes: AtomicU8::new(0),
        }
    }

    pub fn passes(&self) -> u8 {
        self.passes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TexCompiler for FakeCompiler {
    async fn run_pass(
        &self,
        tex_path: &Path,
        output_dir: &Path,
    ) -> Result<PassOutput, CompileError> {
        let pass = self.passes.fetch_add(1, Ordering::SeqCst) + 1;
        let stem = tex_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        match self.behavior {
            FakeBehavior::FailOnPass(n) if n == pass => Ok(PassOutput {
                success: false,
                log: FAKE_FAILURE_LOG.to_string(),
            }),
            FakeBehavior::TimeOut => Err(CompileError::Timeout(Duration::from_secs(30))),
            FakeBehavior::NoArtifact => Ok(PassOutput {
                success: true,
                log: String::new(),
            }),
            FakeBehavior::Succeed | FakeBehavior::FailOnPass(_) => {
                for ext in ["pdf", "aux", "log", "out"] {
                    tokio::fs::write(output_dir.join(format!("{stem}.{ext}")), b"fake").await?;
                }
                Ok(PassOutput {
                    success: true,
                    log: format!("Output written on {stem}.pdf"),
                })
            }
        }
    }
}
