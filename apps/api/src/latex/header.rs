//! Header formatter: the candidate's name and a `|`-separated contact line.

use crate::latex::escape::{escape_latex, escape_url};
use crate::latex::lines::split_fields;

/// Marker the upstream producer uses for a masked contact field.
const REDACTION_SENTINEL: &str = "redacted";

/// Hosts whose URLs are rendered as clickable profile links.
const PROFILE_HOSTS: &[&str] = &["linkedin.com", "github.com"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactKind {
    Email,
    ProfileLink,
    Plain,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactToken {
    pub raw_text: String,
    pub kind: ContactKind,
}

impl ContactToken {
    pub fn classify(raw: &str) -> Self {
        let lower = raw.to_lowercase();
        let kind = if lower.contains(REDACTION_SENTINEL) {
            ContactKind::Plain
        } else if raw.contains('@') && !raw.contains(char::is_whitespace) {
            ContactKind::Email
        } else if PROFILE_HOSTS.iter().any(|h| lower.contains(h))
            || lower.starts_with("http://")
            || lower.starts_with("https://")
        {
            ContactKind::ProfileLink
        } else {
            ContactKind::Plain
        };
        Self {
            raw_text: raw.to_string(),
            kind,
        }
    }

    fn to_latex(&self) -> String {
        let shown = escape_latex(&self.raw_text);
        match self.kind {
            ContactKind::Email => format!(
                "\\href{{mailto:{}}}{{\\underline{{{shown}}}}}",
                escape_url(&self.raw_text)
            ),
            ContactKind::ProfileLink => format!(
                "\\href{{{}}}{{\\underline{{{shown}}}}}",
                escape_url(&link_target(&self.raw_text))
            ),
            ContactKind::Plain => shown,
        }
    }
}

/// The URL inside a profile token, with `https://` added when it has no scheme.
///
/// Any label before the URL (`LinkedIn: linkedin.com/in/x`) is skipped.
fn link_target(raw: &str) -> String {
    // ASCII lowercasing keeps byte offsets valid for `raw`.
    let lower = raw.to_ascii_lowercase();
    let scheme_at = ["https://", "http://"]
        .iter()
        .filter_map(|scheme| lower.find(*scheme))
        .min();
    let start = scheme_at
        .or_else(|| {
            let at = PROFILE_HOSTS.iter().filter_map(|h| lower.find(*h)).min()?;
            Some(if lower[..at].ends_with("www.") { at - 4 } else { at })
        })
        .unwrap_or(0);

    let url = raw[start..].split_whitespace().next().unwrap_or_default();
    match scheme_at {
        Some(_) => url.to_string(),
        None => format!("https://{url}"),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderInfo {
    pub display_name: String,
    pub contact_tokens: Vec<ContactToken>,
}

/// Parses a header block.
///
/// Accepts the name on its own line followed by a contact line, or everything on a
/// single `Name | contact | contact` line. Returns `None` when there is no name.
pub fn parse_header(content: &str) -> Option<HeaderInfo> {
    let mut lines = content.lines().map(str::trim).filter(|l| !l.is_empty());

    let first = split_fields(lines.next()?);
    let (name, inline_contacts) = first.split_first()?;
    if name.is_empty() {
        return None;
    }

    let contact_tokens = inline_contacts
        .iter()
        .copied()
        .chain(lines.flat_map(split_fields))
        .filter(|c| !c.is_empty())
        .map(ContactToken::classify)
        .collect();

    Some(HeaderInfo {
        display_name: (*name).to_string(),
        contact_tokens,
    })
}

pub fn render_header(header: &HeaderInfo) -> String {
    let name = escape_latex(&header.display_name);
    if header.contact_tokens.is_empty() {
        return format!("\\begin{{center}}\n    \\textbf{{\\Huge \\scshape {name}}}\n\\end{{center}}");
    }

    let contact_line = header
        .contact_tokens
        .iter()
        .map(ContactToken::to_latex)
        .collect::<Vec<_>>()
        .join(" $|$ ");

    format!(
        "\\begin{{center}}\n    \\textbf{{\\Huge \\scshape {name}}} \\\\ \\vspace{{1pt}}\n    \\small {contact_line}\n\\end{{center}}"
    )
}

/// Formats the HEADER section, or `None` if it has no name.
pub fn format_header(content: &str) -> Option<String> {
    parse_header(content).map(|h| render_header(&h))
}
