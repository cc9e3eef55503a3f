//! Education formatter.
//!
//! Each entry is a pair of two-field lines:
//! ```text
//! School | Location
//! Degree | Date
//! ```
//! A pair with a missing or extra field is dropped; the rest of the section survives.

use tracing::debug;

use crate::latex::escape::escape_latex;
use crate::latex::lines::{content_lines, split_fields};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EducationEntry {
    pub school: String,
    pub location: String,
    pub degree: String,
    pub date: String,
}

fn two_fields(line: &str) -> Option<(&str, &str)> {
    match split_fields(line).as_slice() {
        [a, b] if !a.is_empty() && !b.is_empty() => Some((*a, *b)),
        _ => None,
    }
}

pub fn parse_education(content: &str) -> Vec<EducationEntry> {
    let lines = content_lines(content);
    let mut entries = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let pair = two_fields(lines[i]).zip(lines.get(i + 1).and_then(|l| two_fields(l)));
        match pair {
            Some(((school, location), (degree, date))) => {
                entries.push(EducationEntry {
                    school: school.to_string(),
                    location: location.to_string(),
                    degree: degree.to_string(),
                    date: date.to_string(),
                });
                i += 2;
            }
            None => {
                debug!(line = lines[i], "education: dropping unmatched line");
                i += 1;
            }
        }
    }
    entries
}

pub fn render_education(entries: &[EducationEntry]) -> Option<String> {
    if entries.is_empty() {
        return None;
    }

    let mut latex = String::from("\\section{Education}\n  \\resumeSubHeadingListStart\n");
    for e in entries {
        latex.push_str(&format!(
            "    \\resumeSubheading\n      {{{}}}{{{}}}\n      {{{}}}{{{}}}\n",
            escape_latex(&e.school),
            escape_latex(&e.location),
            escape_latex(&e.degree),
            escape_latex(&e.date),
        ));
    }
    latex.push_str("  \\resumeSubHeadingListEnd");
    Some(latex)
}

/// Formats the EDUCATION section, or `None` if no entry is renderable.
pub fn format_education(content: &str) -> Option<String> {
    render_education(&parse_education(content))
}
