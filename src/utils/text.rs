// src/utils/text.rs
use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s+").expect("Failed to compile WHITESPACE_RE")
});

/// Normalizes extracted text before any pattern is matched against it.
///
/// Applies NFKC (composes full-width/half-width and combining forms to one
/// canonical form), collapses whitespace runs to a single space, and trims.
/// Empty input yields an empty string, never an error.
pub fn clean_text(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }
    let composed: String = raw.nfkc().collect();
    WHITESPACE_RE.replace_all(&composed, " ").trim().to_string()
}
