//! Small text helpers shared across the pipeline.

use crate::constants::REGEXPS;

/// Collapse runs of whitespace into single spaces and trim the ends.
pub fn normalize_whitespace(text: &str) -> String {
    REGEXPS
        .multi_whitespace
        .replace_all(text.trim(), " ")
        .to_string()
}

/// Remove anything that looks like a tag. Defensive only: callers are
/// expected to pass content that already went through the sanitizer.
pub fn strip_tags(html: &str) -> String {
    REGEXPS.tag_strip.replace_all(html, " ").to_string()
}

/// Escape an attribute value for serialization. Minimal on purpose: slashes
/// are routine in href/src values and must pass through untouched.
pub(crate) fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
