//! Projects formatter.
//!
//! Heading shapes:
//! ```text
//! Name | TechStack            Name | TechStack | Date
//! Date line (optional)
//! ```
//! A date of "N/A" or "Not applicable" (any case) renders as an empty date field.

use tracing::debug;

use crate::latex::escape::escape_latex;
use crate::latex::experience::render_item_list;
use crate::latex::lines::{content_lines, is_bullet, split_fields, take_bullets};

const NOT_APPLICABLE: &[&str] = &["n/a", "na", "not applicable"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectEntry {
    pub name: String,
    pub tech_stack: String,
    /// Empty when the producer gave no date or the not-applicable sentinel.
    pub date_range: String,
    pub bullets: Vec<String>,
}

fn normalize_date(raw: &str) -> String {
    let trimmed = raw.trim();
    if NOT_APPLICABLE.iter().any(|s| trimmed.eq_ignore_ascii_case(s)) {
        String::new()
    } else {
        trimmed.to_string()
    }
}

/// Reads a heading at `lines[idx]`; returns `(name, tech, date, lines consumed)`.
fn parse_heading<'a>(lines: &[&'a str], idx: usize) -> Option<(&'a str, &'a str, String, usize)> {
    let line = *lines.get(idx)?;
    if is_bullet(line) || !line.contains('|') {
        return None;
    }

    match split_fields(line)[..] {
        [name, tech, date] => Some((name, tech, normalize_date(date), 1)),
        [name, tech] => match lines.get(idx + 1) {
            Some(next) if !is_bullet(next) && !next.contains('|') => {
                Some((name, tech, normalize_date(next), 2))
            }
            _ => Some((name, tech, String::new(), 1)),
        },
        _ => None,
    }
}

pub fn parse_projects(content: &str) -> Vec<ProjectEntry> {
    let lines = content_lines(content);
    let mut entries = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let Some((name, tech, date_range, span)) = parse_heading(&lines, i) else {
            if !is_bullet(lines[i]) {
                debug!(line = lines[i], "projects: unrecognised heading, skipping entry");
            }
            i += 1;
            continue;
        };
        i += span;

        let bullets = take_bullets(&lines, &mut i);
        if name.is_empty() {
            debug!("projects: heading without a name, skipping entry");
            continue;
        }

        entries.push(ProjectEntry {
            name: name.to_string(),
            tech_stack: tech.to_string(),
            date_range,
            bullets,
        });
    }
    entries
}

pub fn render_projects(entries: &[ProjectEntry]) -> Option<String> {
    if entries.is_empty() {
        return None;
    }

    let mut latex = String::from("\\section{Projects}\n    \\resumeSubHeadingListStart\n");
    for p in entries {
        let title = if p.tech_stack.is_empty() {
            format!("\\textbf{{{}}}", escape_latex(&p.name))
        } else {
            format!(
                "\\textbf{{{}}} $|$ \\emph{{{}}}",
                escape_latex(&p.name),
                escape_latex(&p.tech_stack)
            )
        };
        latex.push_str(&format!(
            "      \\resumeProjectHeading\n          {{{title}}}{{{}}}\n",
            escape_latex(&p.date_range)
        ));
        latex.push_str(&render_item_list(&p.bullets, "          "));
    }
    latex.push_str("    \\resumeSubHeadingListEnd");
    Some(latex)
}

/// Formats the PROJECTS section, or `None` if no heading could be matched.
pub fn format_projects(content: &str) -> Option<String> {
    render_projects(&parse_projects(content))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_with_date_line() {
        let entries = parse_projects(
            "E-Commerce Platform | React, Node.js, MongoDB\nJan 2023 - Mar 2023\n\
             - Developed full-stack e-commerce application with 1,000+ products\n\
             - Achieved 99.9% uptime during beta testing",
        );
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].date_range, "Jan 2023 - Mar 2023");
        assert_eq!(entries[0].bullets.len(), 2);

        let out = render_projects(&entries).unwrap();
        assert!(out.contains(
            r"{\textbf{E-Commerce Platform} $|$ \emph{React, Node.js, MongoDB}}{Jan 2023 - Mar 2023}"
        ));
        assert!(out.contains(r"\textbf{1,000}+ products"));
        assert!(out.contains(r"\textbf{99.9\%}"));
    }

    #[test]
    fn test_three_field_heading_keeps_date_separate() {
        let entries = parse_projects("Tracker | Rust, Axum | 2024\n- Shipped v1");
        assert_eq!(entries[0].tech_stack, "Rust, Axum");
        assert_eq!(entries[0].date_range, "2024");
    }

    #[test]
    fn test_heading_without_date_line() {
        let entries = parse_projects("Tracker | Rust\n- Shipped v1\nPlanner | Go\n- Shipped v2");
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|p| p.date_range.is_empty()));
    }

    #[test]
    fn test_not_applicable_sentinel_renders_empty() {
        for sentinel in ["N/A", "n/a", "Not Applicable"] {
            let content = format!("Portfolio Site | HTML, CSS\n{sentinel}\n- Built site");
            let out = format_projects(&content).unwrap();
            assert!(out.contains(r"\emph{HTML, CSS}}{}"), "{out}");
            assert!(!out.contains(sentinel));
        }
        let out = format_projects("Portfolio Site | HTML | N/A").unwrap();
        assert!(!out.contains("N/A"));
    }

    #[test]
    fn test_unparsable_headings_yield_no_section() {
        assert!(format_projects("Just a sentence about a project\n- bullet").is_none());
        assert!(format_projects("").is_none());
    }

    #[test]
    fn test_entry_without_bullets() {
        let out = format_projects("Tracker | Rust | 2024").unwrap();
        assert!(!out.contains("resumeItemListStart"));
        assert!(out.ends_with("\\resumeSubHeadingListEnd"));
    }
}
