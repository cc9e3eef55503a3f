//! Experience formatter.
//!
//! The producer writes experience headings in three shapes:
//!
//! ```text
//! A:  Title | Date            B:  Company | Location       C:  Title | Company | Location | Date
//!     Company | Location          Title | Date
//! ```
//!
//! A four-field line is always C. For a two-line pair the second field of the first
//! line decides: a date signature means A, anything else means B. All three collapse
//! into one [`ExperienceEntry`] right after parsing, so rendering never sees the dialect.
//! A heading that fits none of the shapes is skipped together with its bullets.

use tracing::debug;

use crate::latex::escape::escape_latex;
use crate::latex::highlight::format_bullet;
use crate::latex::lines::{content_lines, is_bullet, looks_like_date, split_fields, take_bullets};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExperienceEntry {
    pub title: String,
    pub date: String,
    pub company: String,
    pub location: String,
    pub bullets: Vec<String>,
}

/// A heading as written, before normalization to canonical field order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExperienceHeading<'a> {
    /// `Title | Date` then `Company | Location`.
    TitleFirst {
        title: &'a str,
        date: &'a str,
        company: &'a str,
        location: &'a str,
    },
    /// `Company | Location` then `Title | Date`.
    CompanyFirst {
        company: &'a str,
        location: &'a str,
        title: &'a str,
        date: &'a str,
    },
    /// `Title | Company | Location | Date` on one line.
    SingleLine {
        title: &'a str,
        company: &'a str,
        location: &'a str,
        date: &'a str,
    },
}

impl<'a> ExperienceHeading<'a> {
    /// Canonical `(title, date, company, location)`.
    fn canonical(self) -> (&'a str, &'a str, &'a str, &'a str) {
        match self {
            Self::TitleFirst {
                title,
                date,
                company,
                location,
            }
            | Self::CompanyFirst {
                company,
                location,
                title,
                date,
            }
            | Self::SingleLine {
                title,
                company,
                location,
                date,
            } => (title, date, company, location),
        }
    }
}

/// Tries to read a heading at `lines[idx]`. Returns the heading and the number of
/// lines it spans.
pub fn parse_heading<'a>(lines: &[&'a str], idx: usize) -> Option<(ExperienceHeading<'a>, usize)> {
    let line = *lines.get(idx)?;
    if is_bullet(line) {
        return None;
    }

    let first = split_fields(line);
    if let [title, company, location, date] = first[..] {
        return Some((
            ExperienceHeading::SingleLine {
                title,
                company,
                location,
                date,
            },
            1,
        ));
    }

    let [a, b] = first[..] else {
        return None;
    };
    let next = *lines.get(idx + 1)?;
    if is_bullet(next) {
        return None;
    }
    let [c, d] = split_fields(next)[..] else {
        return None;
    };

    let heading = if looks_like_date(b) {
        ExperienceHeading::TitleFirst {
            title: a,
            date: b,
            company: c,
            location: d,
        }
    } else {
        ExperienceHeading::CompanyFirst {
            company: a,
            location: b,
            title: c,
            date: d,
        }
    };
    Some((heading, 2))
}

pub fn parse_experience(content: &str) -> Vec<ExperienceEntry> {
    let lines = content_lines(content);
    let mut entries = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let Some((heading, span)) = parse_heading(&lines, i) else {
            if !is_bullet(lines[i]) {
                debug!(line = lines[i], "experience: unrecognised heading, skipping entry");
            }
            i += 1;
            continue;
        };
        i += span;

        let bullets = take_bullets(&lines, &mut i);
        let (title, date, company, location) = heading.canonical();
        if title.is_empty() || company.is_empty() {
            debug!(title, company, "experience: heading missing title or company, skipping entry");
            continue;
        }

        entries.push(ExperienceEntry {
            title: title.to_string(),
            date: date.to_string(),
            company: company.to_string(),
            location: location.to_string(),
            bullets,
        });
    }
    entries
}

/// Renders `\resumeItem` lines for a bullet group, or nothing for an empty group
/// (an empty item list does not compile).
pub(crate) fn render_item_list(bullets: &[String], indent: &str) -> String {
    if bullets.is_empty() {
        return String::new();
    }
    let mut out = format!("{indent}\\resumeItemListStart\n");
    for bullet in bullets {
        out.push_str(&format!("{indent}  \\resumeItem{{{}}}\n", format_bullet(bullet)));
    }
    out.push_str(&format!("{indent}\\resumeItemListEnd\n"));
    out
}

pub fn render_experience(entries: &[ExperienceEntry]) -> Option<String> {
    if entries.is_empty() {
        return None;
    }

    let mut latex = String::from("\\section{Experience}\n  \\resumeSubHeadingListStart\n\n");
    for e in entries {
        latex.push_str(&format!(
            "    \\resumeSubheading\n      {{{}}}{{{}}}\n      {{{}}}{{{}}}\n",
            escape_latex(&e.title),
            escape_latex(&e.date),
            escape_latex(&e.company),
            escape_latex(&e.location),
        ));
        latex.push_str(&render_item_list(&e.bullets, "      "));
        latex.push('\n');
    }
    latex.push_str("  \\resumeSubHeadingListEnd");
    Some(latex)
}

/// Formats the EXPERIENCE section, or `None` if no heading could be matched.
pub fn format_experience(content: &str) -> Option<String> {
    render_experience(&parse_experience(content))
}
