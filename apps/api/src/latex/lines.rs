//! Line-level helpers shared by the section formatters.

use std::sync::LazyLock;

use regex::Regex;

/// Bullet markers accepted at the start of a line.
const BULLET_MARKERS: &[char] = &['-', '•'];

static DATE_SIGNATURE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:(?:19|20)\d{2}|jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?|present|current)\b",
    )
    .expect("date signature pattern must compile")
});

/// Trimmed, non-blank lines of a section body.
///
/// Lines opening with `(` are producer commentary ("(No projects listed)") and are dropped.
pub fn content_lines(content: &str) -> Vec<&str> {
    content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('('))
        .collect()
}

/// Splits a heading line on `|`, trimming each field.
pub fn split_fields(line: &str) -> Vec<&str> {
    line.split('|').map(str::trim).collect()
}

pub fn is_bullet(line: &str) -> bool {
    line.starts_with(BULLET_MARKERS)
}

/// Text of a bullet line without its marker, or `None` if the line is not a bullet.
pub fn bullet_text(line: &str) -> Option<&str> {
    line.strip_prefix(BULLET_MARKERS).map(str::trim)
}

/// Collects consecutive bullet lines starting at `*idx`, advancing `idx` past them.
/// Bullets with no text after the marker are dropped.
pub fn take_bullets(lines: &[&str], idx: &mut usize) -> Vec<String> {
    let mut bullets = Vec::new();
    while let Some(text) = lines.get(*idx).and_then(|l| bullet_text(l)) {
        if !text.is_empty() {
            bullets.push(text.to_string());
        }
        *idx += 1;
    }
    bullets
}

/// True if `field` carries a date signature: a 19xx/20xx year, a month name, or
/// "Present"/"Current".
pub fn looks_like_date(field: &str) -> bool {
    DATE_SIGNATURE.is_match(field)
}
