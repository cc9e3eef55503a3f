//! Document assembler: canonical order, empty sections omitted.

use std::collections::BTreeMap;

use tracing::debug;

use crate::latex::education::format_education;
use crate::latex::experience::format_experience;
use crate::latex::header::format_header;
use crate::latex::projects::format_projects;
use crate::latex::sections::{section_map, SectionKind, SectionTable};
use crate::latex::skills::format_skills;

/// One formatted section, ready for the template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedSection {
    pub kind: SectionKind,
    pub latex: String,
}

/// The assembled resume body. Holds at most one section per kind, in canonical order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    sections: Vec<RenderedSection>,
}

impl Document {
    pub fn kinds(&self) -> Vec<SectionKind> {
        self.sections.iter().map(|s| s.kind).collect()
    }

    /// The LaTeX body that replaces the template placeholder.
    pub fn to_latex(&self) -> String {
        self.sections
            .iter()
            .map(|s| s.latex.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

fn format_section(kind: SectionKind, content: &str) -> Option<String> {
    match kind {
        SectionKind::Header => format_header(content),
        SectionKind::Education => format_education(content),
        SectionKind::Skills => format_skills(content),
        SectionKind::Experience => format_experience(content),
        SectionKind::Projects => format_projects(content),
    }
}

/// Formats each resolved section in canonical order, dropping those with no entries.
pub fn assemble(sections: &BTreeMap<SectionKind, String>) -> Document {
    let mut document = Document::default();
    for kind in SectionKind::CANONICAL_ORDER {
        let Some(content) = sections.get(&kind) else {
            continue;
        };
        match format_section(kind, content) {
            Some(latex) => document.sections.push(RenderedSection { kind, latex }),
            None => debug!(section = ?kind, "section has no renderable entries, omitted"),
        }
    }
    document
}

/// Compiles producer text into an assembled [`Document`].
pub fn compile_resume(text: &str, table: &SectionTable) -> Document {
    assemble(&section_map(text, table))
}
