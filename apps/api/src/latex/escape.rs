//! LaTeX escaping as a two-phase transform.
//!
//! Phase 1 lexes the input into a token stream where every reserved character
//! becomes its own token and backslashes get a dedicated variant. Phase 2 renders
//! each token exactly once. Because the safe forms are only ever produced in phase 2
//! and never re-scanned, the backslashes inside `\&`, `\%` etc. cannot be escaped
//! a second time.

/// One lexical unit of escapable text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscapeToken<'a> {
    /// A run of characters that pass through untouched.
    Text(&'a str),
    /// A markup-reserved character other than backslash.
    Reserved(char),
    /// A literal backslash. Rendered last, never confused with generated escapes.
    Backslash,
}

/// Characters that must never reach the typesetter unescaped (backslash excluded).
const RESERVED: &[char] = &['&', '%', '$', '#', '_', '{', '}', '~', '^'];

/// Phase 1: split `text` into passthrough runs, reserved characters and backslashes.
pub fn tokenize(text: &str) -> Vec<EscapeToken<'_>> {
    let mut tokens = Vec::new();
    let mut run_start = 0;

    for (idx, ch) in text.char_indices() {
        let token = if ch == '\\' {
            EscapeToken::Backslash
        } else if RESERVED.contains(&ch) {
            EscapeToken::Reserved(ch)
        } else {
            continue;
        };

        if run_start < idx {
            tokens.push(EscapeToken::Text(&text[run_start..idx]));
        }
        tokens.push(token);
        run_start = idx + ch.len_utf8();
    }

    if run_start < text.len() {
        tokens.push(EscapeToken::Text(&text[run_start..]));
    }
    tokens
}

/// Phase 2: render a token stream into typesetting-safe text.
pub fn render_tokens(tokens: &[EscapeToken<'_>]) -> String {
    let mut out = String::new();
    for token in tokens {
        match token {
            EscapeToken::Text(s) => out.push_str(s),
            EscapeToken::Reserved(ch) => out.push_str(reserved_safe_form(*ch)),
            EscapeToken::Backslash => out.push_str(r"\textbackslash{}"),
        }
    }
    out
}

fn reserved_safe_form(ch: char) -> &'static str {
    match ch {
        '&' => r"\&",
        '%' => r"\%",
        '$' => r"\$",
        '#' => r"\#",
        '_' => r"\_",
        '{' => r"\{",
        '}' => r"\}",
        '~' => r"\textasciitilde{}",
        '^' => r"\^{}",
        // tokenize() only emits characters from RESERVED
        _ => "",
    }
}

/// Escapes every LaTeX-reserved character in `text` exactly once.
pub fn escape_latex(text: &str) -> String {
    render_tokens(&tokenize(text))
}

/// Escapes a URL for use as the first argument of `\href`.
///
/// `%` and `#` are escaped as `\%` and `\#`, which hyperref turns back into the
/// literal characters in the link target. `~` is kept verbatim. Braces, backslashes
/// and whitespace cannot appear in a target and are dropped.
pub fn escape_url(url: &str) -> String {
    let mut out = String::with_capacity(url.len());
    for ch in url.chars() {
        match ch {
            '%' => out.push_str(r"\%"),
            '#' => out.push_str(r"\#"),
            '{' | '}' | '\\' => {}
            c if c.is_whitespace() => {}
            c => out.push(c),
        }
    }
    out
}
