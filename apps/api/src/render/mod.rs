// Artifact naming and compilation driver.
// Fills the template with the assembled body, reserves a collision-free name in the
// output directory, and runs the external toolchain twice. Only the failures below
// are fatal; malformed entries and empty sections never reach this layer.

pub mod compiler;
pub mod handlers;
pub mod naming;
pub mod pipeline;
pub mod template;

#[cfg(test)]
pub(crate) mod test_support;

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

pub use compiler::PdfLatex;
pub use pipeline::RenderContext;
pub use template::{FileTemplate, StaticTemplate, TemplateProvider};

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("LaTeX compilation timed out after {0:?}")]
    Timeout(Duration),

    /// Non-zero exit from the toolchain. `log` is the compiler's own output, verbatim.
    #[error("LaTeX compilation failed on pass {pass}: {log}")]
    Failure { pass: u8, log: String },

    #[error("Compiler reported success but {} was not generated", .0.display())]
    MissingArtifact(PathBuf),

    #[error("Template error: {0}")]
    Template(String),

    #[error("No free output name after {0} attempts")]
    NameExhausted(u32),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
