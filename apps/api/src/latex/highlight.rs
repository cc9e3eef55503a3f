//! Quantitative-metric highlighting.
//!
//! Highlighting runs on the raw (unescaped) bullet text so the numeric patterns can
//! see literal `%` and `$`. Matches become non-overlapping [`HighlightSpan`]s, the
//! spans split the text into a [`RichText`] of plain and emphasized segments, and
//! only then is each segment escaped on its own. The emphasis wrapper is emitted
//! after escaping, so it is never itself escaped.
//!
//! Rule order matters: a later rule can never claim characters an earlier rule
//! already highlighted.
//!
//! | # | Rule              | Example             |
//! |---|-------------------|---------------------|
//! | 1 | percentage        | `50%`, `12.5%`      |
//! | 2 | currency + suffix | `$2.5M`, `$40k`     |
//! | 3 | currency          | `$1,000`, `$50.00`  |
//! | 4 | grouped number    | `10,000`            |
//! | 5 | suffixed number   | `5K`, `1B`          |
//! | 6 | spelled-out scale | `2 million`         |
//! | 7 | multiplier        | `3x`, `1.5x`        |
//! | 8 | small range       | `5-10` (max 2 digits per side) |
//!
//! No rule matches a bare year, and rule 8 is bounded to two digits per side so a
//! year range such as `2021-2023` is left alone.

use std::sync::LazyLock;

use regex::Regex;

use crate::latex::escape::escape_latex;

// ────────────────────────────────────────────────────────────────────────────
// Spans and segments
// ────────────────────────────────────────────────────────────────────────────

/// Byte range `[start, end)` of a substring to emphasize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightSpan {
    pub start: usize,
    pub end: usize,
}

impl HighlightSpan {
    fn overlaps(&self, other: &HighlightSpan) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// A piece of bullet text, either plain or marked for emphasis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Plain(&'a str),
    Emphasized(&'a str),
}

/// Bullet text split into typed segments. Nothing in here is escaped yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RichText<'a> {
    segments: Vec<Segment<'a>>,
}

impl<'a> RichText<'a> {
    /// Builds segments from `text` and a sorted, non-overlapping span list.
    fn from_spans(text: &'a str, spans: &[HighlightSpan]) -> Self {
        let mut segments = Vec::with_capacity(spans.len() * 2 + 1);
        let mut cursor = 0;
        for span in spans {
            if cursor < span.start {
                segments.push(Segment::Plain(&text[cursor..span.start]));
            }
            segments.push(Segment::Emphasized(&text[span.start..span.end]));
            cursor = span.end;
        }
        if cursor < text.len() {
            segments.push(Segment::Plain(&text[cursor..]));
        }
        Self { segments }
    }

    #[cfg(test)]
    pub fn segments(&self) -> &[Segment<'a>] {
        &self.segments
    }

    /// The substrings that will be emphasized, in order.
    #[cfg(test)]
    pub fn emphasized(&self) -> Vec<&'a str> {
        self.segments
            .iter()
            .filter_map(|s| match s {
                Segment::Emphasized(t) => Some(*t),
                Segment::Plain(_) => None,
            })
            .collect()
    }

    /// Escapes every segment independently and wraps emphasized ones in `\textbf{}`.
    pub fn to_latex(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Plain(t) => out.push_str(&escape_latex(t)),
                Segment::Emphasized(t) => {
                    out.push_str(r"\textbf{");
                    out.push_str(&escape_latex(t));
                    out.push('}');
                }
            }
        }
        out
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Rules
// ────────────────────────────────────────────────────────────────────────────

/// Extra context check on a regex match: `(text, start, end) -> accept`.
type Guard = fn(&str, usize, usize) -> bool;

struct MetricRule {
    name: &'static str,
    pattern: Regex,
    guard: Guard,
    /// Percentages and multipliers take a leading small range (`10-20%`) into the span.
    absorbs_range: bool,
}

impl MetricRule {
    fn absorbing_range(mut self) -> Self {
        self.absorbs_range = true;
        self
    }
}

fn always(_: &str, _: usize, _: usize) -> bool {
    true
}

fn char_before(text: &str, idx: usize) -> Option<char> {
    text[..idx].chars().next_back()
}

fn char_after(text: &str, idx: usize) -> Option<char> {
    text[idx..].chars().next()
}

/// True when `idx` starts a `.` followed by a digit, i.e. the number continues as a decimal.
fn decimal_follows(text: &str, idx: usize) -> bool {
    let mut rest = text[idx..].chars();
    rest.next() == Some('.') && rest.next().is_some_and(|c| c.is_ascii_digit())
}

fn currency_guard(text: &str, _start: usize, end: usize) -> bool {
    !char_after(text, end).is_some_and(|c| c.is_ascii_digit())
}

fn grouped_number_guard(text: &str, start: usize, end: usize) -> bool {
    let before_ok = !char_before(text, start)
        .is_some_and(|c| c == '$' || c == ',' || c == '.' || c.is_ascii_digit());
    let after_ok =
        !char_after(text, end).is_some_and(|c| c.is_ascii_digit()) && !decimal_follows(text, end);
    before_ok && after_ok
}

fn small_range_guard(text: &str, start: usize, end: usize) -> bool {
    let before_ok = !char_before(text, start).is_some_and(|c| c == '.' || c == '-' || c == '$');
    let after_ok = !decimal_follows(text, end) && char_after(text, end) != Some('-');
    before_ok && after_ok
}

fn rule(name: &'static str, pattern: &str, guard: Guard) -> MetricRule {
    MetricRule {
        name,
        // Patterns are literals below; a failure here is a programming error.
        pattern: Regex::new(pattern).expect("metric highlight pattern must compile"),
        guard,
        absorbs_range: false,
    }
}

static RANGE_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b\d{1,2}\s?[-–]\s?$").expect("range prefix pattern must compile")
});

/// Start of a small range (`10-`) ending right at `start`, if one passes the range guard.
fn range_prefix_start(text: &str, start: usize) -> Option<usize> {
    let prefix = RANGE_PREFIX.find(&text[..start])?;
    small_range_guard(text, prefix.start(), start).then_some(prefix.start())
}

static METRIC_RULES: LazyLock<Vec<MetricRule>> = LazyLock::new(|| {
    vec![
        rule("percentage", r"\d+(?:\.\d+)?%", always).absorbing_range(),
        rule("currency_suffixed", r"(?i)\$\d+(?:\.\d+)?[kmb]\b", always),
        rule(
            "currency",
            r"\$(?:\d{1,3}(?:,\d{3})+|\d+)(?:\.\d+)?",
            currency_guard,
        ),
        rule("grouped_number", r"\d{1,3}(?:,\d{3})+", grouped_number_guard),
        rule("suffixed_number", r"(?i)\b\d+(?:\.\d+)?[kmb]\b", always),
        rule(
            "spelled_scale",
            r"(?i)\b\d+(?:\.\d+)?\s*(?:million|billion|thousand)\b",
            always,
        ),
        rule("multiplier", r"(?i)\b\d+(?:\.\d+)?x\b", always).absorbing_range(),
        rule("small_range", r"\b\d{1,2}\s?[-–]\s?\d{1,2}\b", small_range_guard),
    ]
});

// ────────────────────────────────────────────────────────────────────────────
// Public API
// ────────────────────────────────────────────────────────────────────────────

/// Finds metric spans in raw `text`, sorted by start offset and non-overlapping.
pub fn find_highlight_spans(text: &str) -> Vec<HighlightSpan> {
    let mut spans: Vec<HighlightSpan> = Vec::new();

    for rule in METRIC_RULES.iter() {
        for m in rule.pattern.find_iter(text) {
            if !(rule.guard)(text, m.start(), m.end()) {
                continue;
            }
            let start = rule
                .absorbs_range
                .then(|| range_prefix_start(text, m.start()))
                .flatten()
                .unwrap_or(m.start());
            let candidate = HighlightSpan { start, end: m.end() };
            if spans.iter().any(|s| s.overlaps(&candidate)) {
                continue;
            }
            tracing::trace!(
                rule = rule.name,
                matched = &text[candidate.start..candidate.end],
                "metric highlighted"
            );
            spans.push(candidate);
        }
    }

    spans.sort_by_key(|s| s.start);
    spans
}

/// Splits raw `text` into plain and emphasized segments.
pub fn highlight_metrics(text: &str) -> RichText<'_> {
    let spans = find_highlight_spans(text);
    RichText::from_spans(text, &spans)
}

/// Highlights metrics in a raw bullet and returns escaped LaTeX.
pub fn format_bullet(text: &str) -> String {
    highlight_metrics(text).to_latex()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emphasized(text: &str) -> Vec<&str> {
        highlight_metrics(text).emphasized()
    }

    #[test]
    fn test_percentages() {
        assert_eq!(
            emphasized("Improved performance by 50% and reduced costs by 25.5%"),
            vec!["50%", "25.5%"]
        );
    }

    #[test]
    fn test_currency() {
        assert_eq!(
            emphasized("Saved $1,000 and generated $50,000.00 in revenue"),
            vec!["$1,000", "$50,000.00"]
        );
    }

    #[test]
    fn test_currency_with_suffix_claimed_once() {
        assert_eq!(emphasized("Raised $2.5M seed round"), vec!["$2.5M"]);
        assert_eq!(emphasized("Closed $40k deals"), vec!["$40k"]);
    }

    #[test]
    fn test_grouped_numbers() {
        assert_eq!(
            emphasized("Processed 10,000 requests and handled 1,000,000 users"),
            vec!["10,000", "1,000,000"]
        );
        assert_eq!(emphasized("Served 10,000+ customers."), vec!["10,000"]);
    }

    #[test]
    fn test_small_range_highlighted_year_range_not() {
        let found = emphasized("Managed team of 5-10 people from 2021-2023");
        assert_eq!(found, vec!["5-10"]);
    }

    #[test]
    fn test_range_with_percent_or_multiplier_is_one_span() {
        assert_eq!(emphasized("Managed 10-20% of traffic"), vec!["10-20%"]);
        assert_eq!(emphasized("Cut 5-10x latency"), vec!["5-10x"]);
        assert_eq!(emphasized("Grew 3 – 4x in a year"), vec!["3 – 4x"]);
        assert_eq!(
            format_bullet("Managed 10-20% of traffic"),
            r"Managed \textbf{10-20\%} of traffic"
        );
    }

    #[test]
    fn test_range_prefix_not_absorbed_across_decimal_or_year() {
        assert_eq!(emphasized("Rated 3.5-4.5% better"), vec!["4.5%"]);
        assert_eq!(emphasized("Since 2020-25% growth"), vec!["25%"]);
        assert_eq!(emphasized("Handled 100-20% of load"), vec!["20%"]);
    }

    #[test]
    fn test_three_digit_range_is_not_treated_as_small() {
        assert!(emphasized("Handled 100-200 tickets").is_empty());
    }

    #[test]
    fn test_decimal_range_not_split() {
        assert!(emphasized("Rated 3.5-4.5 stars").is_empty());
    }

    #[test]
    fn test_abbreviated_numbers() {
        assert_eq!(
            emphasized("Reached 5K users, generated 2.5M in revenue, worth 1B"),
            vec!["5K", "2.5M", "1B"]
        );
    }

    #[test]
    fn test_spelled_out_scale() {
        assert_eq!(
            emphasized("Scaled to 2 million daily users"),
            vec!["2 million"]
        );
    }

    #[test]
    fn test_multipliers() {
        assert_eq!(
            emphasized("Achieved 2x growth and 10x increase in efficiency"),
            vec!["2x", "10x"]
        );
    }

    #[test]
    fn test_years_never_highlighted() {
        for text in [
            "Won award in Oct 2023, started in 2020, graduated in 2023",
            "Won Employee of the Year award in Oct 2025",
            "Published paper in January 2024",
            "Completed certification in Dec 2021",
            "Led migration 2019-2021",
        ] {
            assert!(emphasized(text).is_empty(), "unexpected highlight in {text:?}");
        }
    }

    #[test]
    fn test_small_counts_not_highlighted() {
        assert!(emphasized("Led team of 5 data scientists").is_empty());
    }

    #[test]
    fn test_spans_sorted_and_disjoint() {
        let text = "Cut spend $1,200 (15%) across 3x more regions, 10,000 users";
        let spans = find_highlight_spans(text);
        for pair in spans.windows(2) {
            assert!(pair[0].end <= pair[1].start);
        }
        assert_eq!(spans.len(), 4);
    }

    #[test]
    fn test_format_bullet_escapes_inside_and_outside_spans() {
        assert_eq!(
            format_bullet("Grew revenue by 25% & cut costs $1,000"),
            r"Grew revenue by \textbf{25\%} \& cut costs \textbf{\$1,000}"
        );
    }

    #[test]
    fn test_format_bullet_wrapper_not_escaped() {
        let out = format_bullet("Reduced latency by 40%");
        assert_eq!(out, r"Reduced latency by \textbf{40\%}");
        assert!(!out.contains(r"\textbackslash"));
        assert!(!out.contains(r"\{"));
    }

    #[test]
    fn test_format_bullet_without_metrics_is_plain_escape() {
        assert_eq!(
            format_bullet("Built C# services_v2"),
            escape_latex("Built C# services_v2")
        );
    }

    #[test]
    fn test_rich_text_segments() {
        let rich = highlight_metrics("by 25% today");
        assert_eq!(
            rich.segments(),
            &[
                Segment::Plain("by "),
                Segment::Emphasized("25%"),
                Segment::Plain(" today"),
            ]
        );
    }
}
