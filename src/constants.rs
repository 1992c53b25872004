//! Constants, regular expressions, and static policy data used throughout the library.

use once_cell::sync::Lazy;
use regex::Regex;

// Bitflags for the supplementary sanitize passes
bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SanitizeFlags: u32 {
        const REGEX_FALLBACK = 0x1;
        const NORMALIZE_WHITESPACE = 0x2;
    }
}

impl Default for SanitizeFlags {
    fn default() -> Self {
        SanitizeFlags::all()
    }
}

// Tags that survive sanitization. Anything else is unwrapped (or dropped,
// see DROPPED_TAGS).
pub const DEFAULT_ALLOWED_TAGS: &[&str] = &[
    "h1", "h2", "h3", "h4", "h5", "h6", "p", "br", "hr", "strong", "b", "em", "i", "u", "strike",
    "del", "ul", "ol", "li", "a", "img", "blockquote", "pre", "code", "cite", "q", "table",
    "thead", "tbody", "tr", "th", "td", "div", "span",
];

// Disallowed tags whose text content must not leak into the output. These are
// removed together with their subtree instead of being unwrapped.
pub const DROPPED_TAGS: &[&str] = &[
    "script", "style", "noscript", "template", "iframe", "object", "embed", "form", "button",
    "select", "textarea", "input", "head", "link", "meta", "svg", "canvas", "audio", "video",
];

// Attributes stripped from every element, whatever the tag.
pub const DEFAULT_FORBIDDEN_ATTRIBUTES: &[&str] = &[
    "style",
    "class",
    "id",
    "onclick",
    "onload",
    "onerror",
    "onmouseover",
    "onmouseout",
    "onfocus",
    "onblur",
];

// Per-tag attribute whitelist. Tags without an entry keep no attributes.
pub const DEFAULT_ALLOWED_ATTRIBUTES: &[(&str, &[&str])] = &[
    ("a", &["href", "title", "target"]),
    ("img", &["src", "alt", "title"]),
    ("blockquote", &["cite"]),
    ("q", &["cite"]),
];

// Elements serialized without a closing tag.
pub const VOID_ELEMS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

// Search keywords used when nothing useful can be extracted from the content.
pub const FALLBACK_KEYWORDS: &[&str] = &["business", "technology", "professional"];

// Common English function words excluded from keyword extraction.
pub const STOP_WORDS: &[&str] = &[
    "this", "that", "with", "have", "will", "from", "they", "know", "want", "been", "good", "much",
    "some", "time", "very", "when", "come", "here", "just", "like", "long", "make", "many", "over",
    "such", "take", "than", "them", "well", "were", "what", "your", "about", "after", "again",
    "before", "being", "below", "between", "both", "during", "each", "further", "having", "into",
    "more", "most", "other", "should", "through", "under", "until", "while", "above", "against",
    "because", "doing", "down", "once", "only", "same", "there", "these", "those", "where",
    "which", "would",
];

// Regular expressions (compiled once)
pub static REGEXPS: Lazy<RegexPatterns> = Lazy::new(RegexPatterns::new);

pub struct RegexPatterns {
    pub style_attr: Regex,
    pub class_attr: Regex,
    pub id_attr: Regex,
    pub data_attr: Regex,
    pub between_tags: Regex,
    pub multi_whitespace: Regex,
    pub before_close: Regex,
    pub tag_strip: Regex,
    pub alpha_token: Regex,
    pub word: Regex,
    pub paragraph_marker: Regex,
    pub multi_blank_lines: Regex,
}

impl RegexPatterns {
    fn new() -> Self {
        Self {
            style_attr: Regex::new(r#"(?i)\s+style\s*=\s*("[^"]*"|'[^']*')"#).unwrap(),
            class_attr: Regex::new(r#"(?i)\s+class\s*=\s*("[^"]*"|'[^']*')"#).unwrap(),
            id_attr: Regex::new(r#"(?i)\s+id\s*=\s*("[^"]*"|'[^']*')"#).unwrap(),
            data_attr: Regex::new(r#"(?i)\s+data-[\w-]+\s*=\s*("[^"]*"|'[^']*')"#).unwrap(),
            between_tags: Regex::new(r">\s+<").unwrap(),
            multi_whitespace: Regex::new(r"\s+").unwrap(),
            before_close: Regex::new(r"\s+>").unwrap(),
            tag_strip: Regex::new(r"<[^>]+>").unwrap(),
            alpha_token: Regex::new(r"\b[a-zA-Z]{4,}\b").unwrap(),
            word: Regex::new(r"\w+").unwrap(),
            paragraph_marker: Regex::new(r"\n\s*\n|</p>\s*<p>|</p>|<p>").unwrap(),
            multi_blank_lines: Regex::new(r"\n{3,}").unwrap(),
        }
    }
}
