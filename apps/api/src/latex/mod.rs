// Structured resume → LaTeX compiler.
// Pure and synchronous: normalizer → splitter → per-section formatters → assembler.
// Nothing in here touches the filesystem; see `render` for the compilation driver.

pub mod assembler;
pub mod education;
pub mod escape;
pub mod experience;
pub mod header;
pub mod highlight;
pub mod lines;
pub mod projects;
pub mod sections;
pub mod skills;

// Re-export the API consumed by the render pipeline and handlers.
pub use assembler::compile_resume;
pub use sections::{SectionKind, SectionTable};
