//! String transformation utilities for code generation

use once_cell::sync::Lazy;
use regex::Regex;

static IDENTIFIER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[\p{Alphabetic}_$][\p{Alphabetic}0-9_$]*$").expect("identifier pattern is valid")
});

/// Whether `s` can be used verbatim as an identifier in the generated client
pub fn is_valid_identifier(s: &str) -> bool {
    IDENTIFIER_RE.is_match(s)
}

/// Upper-case the first character, leaving the rest untouched
pub fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
    }
}

/// Lower-case the first character, leaving the rest untouched
pub fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_lowercase().collect::<String>() + chars.as_str(),
    }
}

/// Letters (any script), ASCII digits, `_` and `$`
fn is_identifier_char(ch: char) -> bool {
    ch.is_alphabetic() || ch.is_ascii_digit() || ch == '_' || ch == '$'
}

/// Strip characters that cannot appear in an identifier.
///
/// Each removed run upper-cases the character that follows it, so
/// `user-profile` becomes `userProfile`. A leading digit gets a `_` prefix.
/// Already valid identifiers are returned unchanged.
pub fn sanitize_identifier(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut pending_upper = false;

    for ch in s.chars() {
        if is_identifier_char(ch) {
            if pending_upper && !result.is_empty() {
                result.extend(ch.to_uppercase());
            } else {
                result.push(ch);
            }
            pending_upper = false;
        } else {
            pending_upper = true;
        }
    }

    if result.starts_with(|c: char| c.is_ascii_digit()) {
        result.insert(0, '_');
    }

    result
}

/// Escape a value for use inside a single-quoted string literal
pub fn escape_single_quoted(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            other => out.push(other),
        }
    }
    out
}

/// Make a value safe to place inside a block comment on a single line
pub fn sanitize_comment(s: &str) -> String {
    s.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace("*/", "* /")
}
