//! Section normalization and splitting.
//!
//! Two passes over the producer's text:
//! 1. **Bracket repair**: a bare line that names a known section (any case,
//!    optional trailing colon) is rewritten to `[NAME]` when real content follows.
//! 2. **Split**: the text is cut at every line that is exactly `[ALL CAPS WORDS]`.
//!
//! Marker names are then resolved against a [`SectionTable`]. Unknown names are
//! ignored and, for each canonical kind, the first marker wins.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tracing::debug;

/// How many lines after a bare header are inspected for content.
const REPAIR_LOOKAHEAD: usize = 3;

static MARKER_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[([A-Z]+(?: [A-Z]+)*)\]$").expect("section marker pattern must compile")
});

// ────────────────────────────────────────────────────────────────────────────
// Section kinds and aliases
// ────────────────────────────────────────────────────────────────────────────

/// Canonical section slots. The derived ordering is the output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Header,
    Education,
    Skills,
    Experience,
    Projects,
}

impl SectionKind {
    pub const CANONICAL_ORDER: [SectionKind; 5] = [
        SectionKind::Header,
        SectionKind::Education,
        SectionKind::Skills,
        SectionKind::Experience,
        SectionKind::Projects,
    ];
}

/// Maps upper-case marker names to section kinds.
///
/// Built once at startup and passed into the compiler, so alias resolution can be
/// swapped out in tests.
#[derive(Debug, Clone)]
pub struct SectionTable {
    aliases: Vec<(String, SectionKind)>,
}

impl SectionTable {
    pub fn new() -> Self {
        Self {
            aliases: Vec::new(),
        }
    }

    /// Registers `name` (case-insensitive) as a marker for `kind`.
    pub fn with_alias(mut self, name: &str, kind: SectionKind) -> Self {
        self.aliases.push((name.trim().to_uppercase(), kind));
        self
    }

    pub fn resolve(&self, name: &str) -> Option<SectionKind> {
        let upper = name.trim().to_uppercase();
        self.aliases
            .iter()
            .find(|(alias, _)| *alias == upper)
            .map(|(_, kind)| *kind)
    }

    pub fn is_known(&self, name: &str) -> bool {
        self.resolve(name).is_some()
    }
}

impl Default for SectionTable {
    fn default() -> Self {
        Self::new()
            .with_alias("HEADER", SectionKind::Header)
            .with_alias("EDUCATION", SectionKind::Education)
            .with_alias("TECHNICAL SKILLS", SectionKind::Skills)
            .with_alias("SKILLS", SectionKind::Skills)
            .with_alias("EXPERIENCE", SectionKind::Experience)
            .with_alias("PROJECTS", SectionKind::Projects)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Pass 1: bracket repair
// ────────────────────────────────────────────────────────────────────────────

fn is_code_fence(line: &str) -> bool {
    line.trim_start().starts_with("```")
}

/// Rewrites bare section names to `[NAME]` markers and strips code fences.
///
/// A bare name whose next content line is already a marker is a duplicate heading
/// and is dropped.
pub fn normalize_section_headers(text: &str, table: &SectionTable) -> String {
    let lines: Vec<&str> = text.lines().filter(|l| !is_code_fence(l)).collect();
    let mut out = Vec::with_capacity(lines.len());

    for (idx, line) in lines.iter().enumerate() {
        let trimmed = line.trim();
        let bare = trimmed
            .strip_suffix(':')
            .unwrap_or(trimmed)
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");

        let already_marked = trimmed.starts_with('[') && trimmed.ends_with(']');
        if already_marked || bare.is_empty() || !table.is_known(&bare) {
            out.push((*line).to_string());
            continue;
        }

        let next_content = lines
            .iter()
            .skip(idx + 1)
            .take(REPAIR_LOOKAHEAD)
            .map(|l| l.trim())
            .find(|l| !l.is_empty());

        match next_content {
            Some(next) if MARKER_LINE.is_match(next) => {
                debug!(line = trimmed, "bare section header followed by a marker, dropped");
            }
            Some(_) => {
                debug!(line = trimmed, "repairing bare section header");
                out.push(format!("[{}]", bare.to_uppercase()));
            }
            None => out.push((*line).to_string()),
        }
    }
    out.join("\n")
}

// ────────────────────────────────────────────────────────────────────────────
// Pass 2: split and resolve
// ────────────────────────────────────────────────────────────────────────────

/// A marker name and the raw text that followed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSection {
    pub name: String,
    pub content: String,
}

/// Cuts `text` at `[ALL CAPS]` marker lines. Text before the first marker is dropped.
pub fn split_sections(text: &str) -> Vec<RawSection> {
    let mut sections: Vec<RawSection> = Vec::new();
    let mut current: Option<(String, Vec<&str>)> = None;

    for line in text.lines() {
        if let Some(caps) = MARKER_LINE.captures(line.trim()) {
            if let Some((name, body)) = current.take() {
                sections.push(RawSection {
                    name,
                    content: body.join("\n").trim().to_string(),
                });
            }
            current = Some((caps[1].to_string(), Vec::new()));
        } else if let Some((_, body)) = current.as_mut() {
            body.push(line);
        }
    }

    if let Some((name, body)) = current {
        sections.push(RawSection {
            name,
            content: body.join("\n").trim().to_string(),
        });
    }
    sections
}

/// Resolves raw sections to canonical kinds; first occurrence of each kind wins.
pub fn resolve_sections(
    raw: Vec<RawSection>,
    table: &SectionTable,
) -> BTreeMap<SectionKind, String> {
    let mut map = BTreeMap::new();
    for section in raw {
        match table.resolve(&section.name) {
            Some(kind) if map.contains_key(&kind) => {
                debug!(name = %section.name, "duplicate section marker discarded");
            }
            Some(kind) => {
                map.insert(kind, section.content);
            }
            None => debug!(name = %section.name, "unknown section ignored"),
        }
    }
    map
}

/// Normalizes, splits and resolves producer text in one go.
pub fn section_map(text: &str, table: &SectionTable) -> BTreeMap<SectionKind, String> {
    let normalized = normalize_section_headers(text, table);
    resolve_sections(split_sections(&normalized), table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_headers_repaired() {
        let text = "Education\nArizona State University | Tempe, AZ\nMS CS | May 2027\n\n\
                    [EXPERIENCE]\nEngineer | 2024\n\nTechnical Skills\nLanguages: Python";
        let normalized = normalize_section_headers(text, &SectionTable::default());
        assert!(normalized.contains("[EDUCATION]\n"));
        assert!(normalized.contains("[TECHNICAL SKILLS]\n"));
        assert_eq!(normalized.matches("[EXPERIENCE]").count(), 1);
    }

    #[test]
    fn test_case_insensitive_and_colon_repair() {
        let text = "education\nA | B\nC | 2024\nExperience:\nX | Y";
        let normalized = normalize_section_headers(text, &SectionTable::default());
        assert!(normalized.contains("[EDUCATION]"));
        assert!(normalized.contains("[EXPERIENCE]"));
    }

    #[test]
    fn test_bare_header_without_content_not_repaired() {
        let normalized =
            normalize_section_headers("Languages: Rust\nSkills\n\n\n\n", &SectionTable::default());
        assert!(!normalized.contains("[SKILLS]"));
    }

    #[test]
    fn test_bare_header_before_marker_dropped() {
        let text = "[HEADER]\nJane Doe\n\nExperience\n[EXPERIENCE]\nEng | 2024\nAcme | Remote";
        let normalized = normalize_section_headers(text, &SectionTable::default());
        assert_eq!(
            normalized,
            "[HEADER]\nJane Doe\n\n[EXPERIENCE]\nEng | 2024\nAcme | Remote"
        );

        let map = section_map(text, &SectionTable::default());
        assert_eq!(map[&SectionKind::Experience], "Eng | 2024\nAcme | Remote");
        assert_eq!(map[&SectionKind::Header], "Jane Doe");
    }

    #[test]
    fn test_inner_whitespace_collapsed_in_bare_header() {
        let text = "Technical  Skills\nLanguages: Rust";
        let normalized = normalize_section_headers(text, &SectionTable::default());
        assert_eq!(normalized, "[TECHNICAL SKILLS]\nLanguages: Rust");
        assert_eq!(
            section_map(text, &SectionTable::default())[&SectionKind::Skills],
            "Languages: Rust"
        );
    }

    #[test]
    fn test_unknown_bare_word_untouched() {
        let normalized =
            normalize_section_headers("Summary\nSome text", &SectionTable::default());
        assert_eq!(normalized, "Summary\nSome text");
    }

    #[test]
    fn test_code_fences_removed() {
        let normalized =
            normalize_section_headers("```\n[SKILLS]\nA: b\n```", &SectionTable::default());
        assert_eq!(normalized, "[SKILLS]\nA: b");
    }

    #[test]
    fn test_split_sections() {
        let sections =
            split_sections("preamble\n[HEADER]\nJane\n\n[TECHNICAL SKILLS]\nA: b\n[FOO]\nbar");
        let names: Vec<_> = sections.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["HEADER", "TECHNICAL SKILLS", "FOO"]);
        assert_eq!(sections[0].content, "Jane");
        assert_eq!(sections[1].content, "A: b");
    }

    #[test]
    fn test_lower_case_marker_is_not_a_split_point() {
        let sections = split_sections("[HEADER]\nJane\n[notes]\nmore");
        assert_eq!(sections.len(), 1);
        assert!(sections[0].content.contains("[notes]"));
    }

    #[test]
    fn test_skills_alias_first_wins() {
        let map = section_map(
            "[TECHNICAL SKILLS]\nLanguages: Python\n\n[SKILLS]\nSoft: Leadership",
            &SectionTable::default(),
        );
        assert_eq!(map.len(), 1);
        assert_eq!(map[&SectionKind::Skills], "Languages: Python");
    }

    #[test]
    fn test_duplicate_markers_first_wins() {
        let map = section_map(
            "[EDUCATION]\nUniversity A | Boston\n[EDUCATION]\nUniversity B | NYC",
            &SectionTable::default(),
        );
        assert_eq!(map[&SectionKind::Education], "University A | Boston");
    }

    #[test]
    fn test_injected_table() {
        let table = SectionTable::new()
            .with_alias("WORK HISTORY", SectionKind::Experience)
            .with_alias("header", SectionKind::Header);
        let map = section_map("[HEADER]\nJane\n[WORK HISTORY]\nA | B\n[EXPERIENCE]\nC | D", &table);
        assert_eq!(map[&SectionKind::Experience], "A | B");
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_canonical_order_matches_ord() {
        let mut sorted = SectionKind::CANONICAL_ORDER;
        sorted.sort();
        assert_eq!(sorted, SectionKind::CANONICAL_ORDER);
    }
}
